use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "routes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub city: String,
    pub country: String,
    pub created_at: DateTimeWithTimeZone,
}

// Flights reference routes twice (origin and destination); both links are
// declared on the flights side.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
