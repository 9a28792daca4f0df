use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub ticket_id: String,
    pub event: String,
    pub num_tickets: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub total_amount: i64,
    #[sea_orm(column_type = "Text")]
    pub qr_code: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
