use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub jewellery_id: Uuid,
    pub quantity: i32,
    /// Unit price copied from the catalog at purchase time.
    pub price: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Orders,
    #[sea_orm(
        belongs_to = "super::jewellery::Entity",
        from = "Column::JewelleryId",
        to = "super::jewellery::Column::Id"
    )]
    Jewellery,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::jewellery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jewellery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
