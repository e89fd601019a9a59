use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "flights")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub origin_id: Uuid,
    pub destination_id: Uuid,
    pub departure: DateTimeWithTimeZone,
    pub arrival: DateTimeWithTimeZone,
    pub price_cents: i64,
    pub capacity: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::routes::Entity",
        from = "Column::OriginId",
        to = "super::routes::Column::Id"
    )]
    Origin,
    #[sea_orm(
        belongs_to = "super::routes::Entity",
        from = "Column::DestinationId",
        to = "super::routes::Column::Id"
    )]
    Destination,
    #[sea_orm(has_many = "super::tickets::Entity")]
    Tickets,
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
