use sea_orm_migration::prelude::*;

/// Aggregated migrator for the swiftship schema.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_branches_table::Migration),
            Box::new(m20250101_000002_create_customers_table::Migration),
            Box::new(m20250101_000003_create_drivers_table::Migration),
            Box::new(m20250101_000004_create_pricing_rules_table::Migration),
            Box::new(m20250101_000005_create_shipments_table::Migration),
            Box::new(m20250101_000006_create_tracking_events_table::Migration),
            Box::new(m20250101_000007_create_settings_table::Migration),
            Box::new(m20250101_000008_create_users_table::Migration),
        ]
    }
}

mod m20250101_000001_create_branches_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_branches_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Branches::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Branches::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Branches::Name).string().not_null())
                        .col(ColumnDef::new(Branches::Code).string().not_null())
                        .col(ColumnDef::new(Branches::Address).string().not_null())
                        .col(ColumnDef::new(Branches::City).string().not_null())
                        .col(ColumnDef::new(Branches::State).string().null())
                        .col(ColumnDef::new(Branches::Country).string().not_null())
                        .col(ColumnDef::new(Branches::Phone).string().null())
                        .col(ColumnDef::new(Branches::Email).string().null())
                        .col(ColumnDef::new(Branches::Latitude).double().null())
                        .col(ColumnDef::new(Branches::Longitude).double().null())
                        .col(
                            ColumnDef::new(Branches::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Branches::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Branches::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_branches_code")
                        .table(Branches::Table)
                        .col(Branches::Code)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Branches::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Branches {
        Table,
        Id,
        Name,
        Code,
        Address,
        City,
        State,
        Country,
        Phone,
        Email,
        Latitude,
        Longitude,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_customers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::UserId).uuid().null())
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().null())
                        .col(ColumnDef::new(Customers::Phone).string().not_null())
                        .col(ColumnDef::new(Customers::Company).string().null())
                        .col(ColumnDef::new(Customers::Address).string().null())
                        .col(ColumnDef::new(Customers::City).string().null())
                        .col(ColumnDef::new(Customers::State).string().null())
                        .col(ColumnDef::new(Customers::Country).string().not_null())
                        .col(
                            ColumnDef::new(Customers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Customers {
        Table,
        Id,
        UserId,
        Name,
        Email,
        Phone,
        Company,
        Address,
        City,
        State,
        Country,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000003_create_drivers_table {
    use super::m20250101_000001_create_branches_table::Branches;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_drivers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Drivers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Drivers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Drivers::UserId).uuid().null())
                        .col(ColumnDef::new(Drivers::Name).string().not_null())
                        .col(ColumnDef::new(Drivers::Phone).string().not_null())
                        .col(ColumnDef::new(Drivers::Email).string().null())
                        .col(ColumnDef::new(Drivers::LicenseNumber).string().null())
                        .col(ColumnDef::new(Drivers::VehicleType).string().null())
                        .col(ColumnDef::new(Drivers::VehiclePlate).string().null())
                        .col(ColumnDef::new(Drivers::BranchId).uuid().null())
                        .col(
                            ColumnDef::new(Drivers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Drivers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Drivers::UpdatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_drivers_branch_id")
                                .from(Drivers::Table, Drivers::BranchId)
                                .to(Branches::Table, Branches::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Drivers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Drivers {
        Table,
        Id,
        UserId,
        Name,
        Phone,
        Email,
        LicenseNumber,
        VehicleType,
        VehiclePlate,
        BranchId,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000004_create_pricing_rules_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_pricing_rules_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PricingRules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PricingRules::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PricingRules::Name).string().not_null())
                        .col(ColumnDef::new(PricingRules::OriginZone).string().null())
                        .col(
                            ColumnDef::new(PricingRules::DestinationZone)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PricingRules::BasePrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingRules::PricePerKg)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingRules::ExpressMultiplier)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingRules::SameDayMultiplier)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingRules::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(PricingRules::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PricingRules::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PricingRules::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PricingRules {
        Table,
        Id,
        Name,
        OriginZone,
        DestinationZone,
        BasePrice,
        PricePerKg,
        ExpressMultiplier,
        SameDayMultiplier,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000005_create_shipments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Mirrors models::shipment::Model.
            manager
                .create_table(
                    Table::create()
                        .table(Shipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Shipments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Shipments::TrackingNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::SenderName).string().not_null())
                        .col(ColumnDef::new(Shipments::SenderPhone).string().not_null())
                        .col(ColumnDef::new(Shipments::SenderEmail).string().null())
                        .col(ColumnDef::new(Shipments::SenderAddress).string().not_null())
                        .col(ColumnDef::new(Shipments::SenderCity).string().not_null())
                        .col(ColumnDef::new(Shipments::SenderState).string().null())
                        .col(ColumnDef::new(Shipments::ReceiverName).string().not_null())
                        .col(ColumnDef::new(Shipments::ReceiverPhone).string().not_null())
                        .col(ColumnDef::new(Shipments::ReceiverEmail).string().null())
                        .col(
                            ColumnDef::new(Shipments::ReceiverAddress)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::ReceiverCity).string().not_null())
                        .col(ColumnDef::new(Shipments::ReceiverState).string().null())
                        .col(ColumnDef::new(Shipments::DeliveryAddress).string().null())
                        .col(ColumnDef::new(Shipments::DeliveryCity).string().null())
                        .col(ColumnDef::new(Shipments::DeliveryState).string().null())
                        .col(
                            ColumnDef::new(Shipments::PackageDescription)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Shipments::WeightKg).double().not_null())
                        .col(ColumnDef::new(Shipments::DimensionsCm).string().null())
                        .col(ColumnDef::new(Shipments::DeclaredValue).decimal().null())
                        .col(ColumnDef::new(Shipments::ServiceLevel).string().not_null())
                        .col(
                            ColumnDef::new(Shipments::TransportMode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::OriginBranchId).uuid().null())
                        .col(ColumnDef::new(Shipments::DestinationBranchId).uuid().null())
                        .col(ColumnDef::new(Shipments::CurrentBranchId).uuid().null())
                        .col(ColumnDef::new(Shipments::AssignedDriverId).uuid().null())
                        .col(ColumnDef::new(Shipments::CustomerId).uuid().null())
                        .col(ColumnDef::new(Shipments::BasePrice).decimal().not_null())
                        .col(ColumnDef::new(Shipments::WeightCharge).decimal().not_null())
                        .col(
                            ColumnDef::new(Shipments::ServiceCharge)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::InsuranceFee).decimal().not_null())
                        .col(ColumnDef::new(Shipments::TotalAmount).decimal().not_null())
                        .col(
                            ColumnDef::new(Shipments::PaymentStatus)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Shipments::AmountPaid).decimal().null())
                        .col(ColumnDef::new(Shipments::Status).string().not_null())
                        .col(ColumnDef::new(Shipments::CurrentLocation).string().null())
                        .col(
                            ColumnDef::new(Shipments::EstimatedDelivery)
                                .timestamp()
                                .null(),
                        )
                        .col(ColumnDef::new(Shipments::DeliveredAt).timestamp().null())
                        .col(ColumnDef::new(Shipments::PickupDate).timestamp().null())
                        .col(ColumnDef::new(Shipments::PodSignature).string().null())
                        .col(ColumnDef::new(Shipments::PodPhotoUrl).string().null())
                        .col(ColumnDef::new(Shipments::PodReceiverName).string().null())
                        .col(ColumnDef::new(Shipments::Notes).string().null())
                        .col(ColumnDef::new(Shipments::CreatedBy).uuid().null())
                        .col(ColumnDef::new(Shipments::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Shipments::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_tracking_number")
                        .table(Shipments::Table)
                        .col(Shipments::TrackingNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_shipments_status")
                        .table(Shipments::Table)
                        .col(Shipments::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Shipments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Shipments {
        Table,
        Id,
        TrackingNumber,
        SenderName,
        SenderPhone,
        SenderEmail,
        SenderAddress,
        SenderCity,
        SenderState,
        ReceiverName,
        ReceiverPhone,
        ReceiverEmail,
        ReceiverAddress,
        ReceiverCity,
        ReceiverState,
        DeliveryAddress,
        DeliveryCity,
        DeliveryState,
        PackageDescription,
        WeightKg,
        DimensionsCm,
        DeclaredValue,
        ServiceLevel,
        TransportMode,
        OriginBranchId,
        DestinationBranchId,
        CurrentBranchId,
        AssignedDriverId,
        CustomerId,
        BasePrice,
        WeightCharge,
        ServiceCharge,
        InsuranceFee,
        TotalAmount,
        PaymentStatus,
        AmountPaid,
        Status,
        CurrentLocation,
        EstimatedDelivery,
        DeliveredAt,
        PickupDate,
        PodSignature,
        PodPhotoUrl,
        PodReceiverName,
        Notes,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000006_create_tracking_events_table {
    use super::m20250101_000005_create_shipments_table::Shipments;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_tracking_events_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TrackingEvents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TrackingEvents::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TrackingEvents::ShipmentId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrackingEvents::Status).string().not_null())
                        .col(
                            ColumnDef::new(TrackingEvents::EventType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TrackingEvents::Location).string().null())
                        .col(ColumnDef::new(TrackingEvents::BranchId).uuid().null())
                        .col(ColumnDef::new(TrackingEvents::Description).string().null())
                        .col(ColumnDef::new(TrackingEvents::Notes).string().null())
                        .col(ColumnDef::new(TrackingEvents::CreatedBy).uuid().null())
                        .col(
                            ColumnDef::new(TrackingEvents::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tracking_events_shipment_id")
                                .from(TrackingEvents::Table, TrackingEvents::ShipmentId)
                                .to(Shipments::Table, Shipments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tracking_events_shipment_id")
                        .table(TrackingEvents::Table)
                        .col(TrackingEvents::ShipmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TrackingEvents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TrackingEvents {
        Table,
        Id,
        ShipmentId,
        Status,
        EventType,
        Location,
        BranchId,
        Description,
        Notes,
        CreatedBy,
        CreatedAt,
    }
}

mod m20250101_000007_create_settings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000007_create_settings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Settings::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Settings::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Settings::Key).string().not_null())
                        .col(ColumnDef::new(Settings::Value).json().not_null())
                        .col(ColumnDef::new(Settings::Description).string().null())
                        .col(ColumnDef::new(Settings::UpdatedBy).uuid().null())
                        .col(ColumnDef::new(Settings::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Settings::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_settings_key")
                        .table(Settings::Table)
                        .col(Settings::Key)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Settings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Settings {
        Table,
        Id,
        Key,
        Value,
        Description,
        UpdatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000008_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000008_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::DisplayName).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_email")
                        .table(Users::Table)
                        .col(Users::Email)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        PasswordHash,
        DisplayName,
        Role,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}
