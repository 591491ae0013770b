use chrono::{DateTime, Utc};
use sea_orm::DeriveActiveEnum;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub client_id: i64,

    /// Set at creation, never updated.
    pub subject: String,

    pub status: TicketStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Ticket lifecycle.
///
/// Persisted as the display literals of the portal, which must survive a
/// round trip exactly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TicketStatus {
    #[sea_orm(string_value = "Aberto")]
    #[serde(rename = "Aberto")]
    #[strum(serialize = "Aberto")]
    Open,

    #[sea_orm(string_value = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    #[strum(serialize = "Em Andamento")]
    InProgress,

    #[sea_orm(string_value = "Fechado")]
    #[serde(rename = "Fechado")]
    #[strum(serialize = "Fechado")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::ClientId",
        to = "super::profile::Column::Id"
    )]
    Client,

    #[sea_orm(has_many = "super::ticket_messages::Entity")]
    Messages,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::ticket_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn get_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub fn is_closed(&self) -> bool {
        self.status == TicketStatus::Closed
    }
}
