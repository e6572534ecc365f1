use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_column(Users::Id))
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PhoneNumber).string().null().unique_key())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("user"))
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::RefreshToken).text().null())
                    .col(created_at(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reactors::Table)
                    .if_not_exists()
                    .col(id_column(Reactors::Id))
                    .col(ColumnDef::new(Reactors::Name).string().not_null())
                    .col(ColumnDef::new(Reactors::Status).string().not_null())
                    .col(ColumnDef::new(Reactors::Pathway).string().null())
                    .col(ColumnDef::new(Reactors::PdfUrl).string().null())
                    .col(
                        ColumnDef::new(Reactors::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(created_at(Reactors::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Devices::Table)
                    .if_not_exists()
                    .col(id_column(Devices::Id))
                    .col(ColumnDef::new(Devices::Name).string().not_null())
                    .col(ColumnDef::new(Devices::ReactorId).big_integer().not_null())
                    .col(ColumnDef::new(Devices::Status).boolean().not_null().default(false))
                    .col(created_at(Devices::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_devices_reactor")
                            .from(Devices::Table, Devices::ReactorId)
                            .to(Reactors::Table, Reactors::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Readings::Table)
                    .if_not_exists()
                    .col(id_column(Readings::Id))
                    .col(ColumnDef::new(Readings::DeviceId).big_integer().not_null())
                    .col(ColumnDef::new(Readings::Payload).json_binary().not_null())
                    .col(
                        ColumnDef::new(Readings::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_readings_device")
                            .from(Readings::Table, Readings::DeviceId)
                            .to(Devices::Table, Devices::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_readings_device_timestamp")
                    .table(Readings::Table)
                    .col(Readings::DeviceId)
                    .col(Readings::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Experiments::Table)
                    .if_not_exists()
                    .col(id_column(Experiments::Id))
                    .col(ColumnDef::new(Experiments::BatchId).string().not_null())
                    .col(ColumnDef::new(Experiments::ReactorId).big_integer().not_null())
                    .col(ColumnDef::new(Experiments::Operator).string().not_null())
                    .col(ColumnDef::new(Experiments::Date).date().not_null())
                    .col(ColumnDef::new(Experiments::BlockId).string().not_null())
                    .col(ColumnDef::new(Experiments::TimeStart).time().not_null())
                    .col(ColumnDef::new(Experiments::TimeEnd).time().not_null())
                    .col(json_document(Experiments::MaterialFeedstock, "'{}'"))
                    .col(json_document(Experiments::ExposureConditions, "'{}'"))
                    .col(json_document(Experiments::AnalyticalTests, "'[]'"))
                    .col(
                        ColumnDef::new(Experiments::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(created_at(Experiments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_experiments_reactor")
                            .from(Experiments::Table, Experiments::ReactorId)
                            .to(Reactors::Table, Reactors::Id)
                            .on_update(ForeignKeyAction::Cascade)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_experiments_date")
                    .table(Experiments::Table)
                    .col(Experiments::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Experiments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Readings::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Devices::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reactors::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

fn id_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_at<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

fn json_document<T: IntoIden>(name: T, empty: &str) -> ColumnDef {
    ColumnDef::new(name)
        .json_binary()
        .not_null()
        .default(Expr::cust(format!("{empty}::jsonb")))
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PhoneNumber,
    Role,
    IsActive,
    PasswordHash,
    RefreshToken,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reactors {
    Table,
    Id,
    Name,
    Status,
    Pathway,
    PdfUrl,
    DeletedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Devices {
    Table,
    Id,
    Name,
    ReactorId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Readings {
    Table,
    Id,
    DeviceId,
    Payload,
    Timestamp,
}

#[derive(DeriveIden)]
enum Experiments {
    Table,
    Id,
    BatchId,
    ReactorId,
    Operator,
    Date,
    BlockId,
    TimeStart,
    TimeEnd,
    MaterialFeedstock,
    ExposureConditions,
    AnalyticalTests,
    DeletedAt,
    CreatedAt,
}
