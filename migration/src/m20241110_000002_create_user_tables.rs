use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Plans every fresh user database starts with: (id, name, monthly price, devices).
const SEED_PLANS: [(&str, &str, f64, i32); 3] = [
    ("P1", "Plan Básico", 5.49, 1),
    ("P2", "Plan Medio", 9.99, 2),
    ("P3", "Plan Premium", 12.99, 4),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlans::Table)
                    .if_not_exists()
                    .col(string(SubscriptionPlans::Id).primary_key())
                    .col(string(SubscriptionPlans::Name))
                    .col(double(SubscriptionPlans::MonthlyPrice))
                    .col(integer(SubscriptionPlans::DeviceLimit))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string(Users::Id).primary_key())
                    .col(string(Users::Name))
                    .col(string(Users::Email))
                    .col(string(Users::PasswordHash))
                    .col(string_null(Users::Language))
                    .col(string(Users::PlanId))
                    .col(big_integer(Users::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_plan")
                            .from(Users::Table, Users::PlanId)
                            .to(SubscriptionPlans::Table, SubscriptionPlans::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email_unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert.into_table(SubscriptionPlans::Table).columns([
            SubscriptionPlans::Id,
            SubscriptionPlans::Name,
            SubscriptionPlans::MonthlyPrice,
            SubscriptionPlans::DeviceLimit,
        ]);
        for (id, name, price, devices) in SEED_PLANS {
            insert.values_panic([id.into(), name.into(), price.into(), devices.into()]);
        }
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum SubscriptionPlans {
    Table,
    Id,
    Name,
    MonthlyPrice,
    DeviceLimit,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Language,
    PlanId,
    CreatedAt,
}
