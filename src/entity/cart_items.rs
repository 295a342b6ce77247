use sea_orm::entity::prelude::*;

// Unique per (cart_id, jewellery_id); re-adding increments quantity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cart_id: Uuid,
    pub jewellery_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::carts::Entity",
        from = "Column::CartId",
        to = "super::carts::Column::Id"
    )]
    Carts,
    #[sea_orm(
        belongs_to = "super::jewellery::Entity",
        from = "Column::JewelleryId",
        to = "super::jewellery::Column::Id"
    )]
    Jewellery,
}

impl Related<super::carts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carts.def()
    }
}

impl Related<super::jewellery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jewellery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
