use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::jewellery::Entity")]
    Jewellery,
}

impl Related<super::jewellery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jewellery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
