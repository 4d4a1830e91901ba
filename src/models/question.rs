//! Questions asked during ticket purchase.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::i18n::I18nString;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Number,
    String,
    Text,
    Boolean,
    Choice,
    MultipleChoice,
    File,
    Date,
    Time,
    Datetime,
    Country,
    Phone,
}

impl QuestionType {
    /// Answer types that accept a regex rule: free text, short string, number.
    pub fn accepts_regex(self) -> bool {
        matches!(self, Self::Text | Self::String | Self::Number)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub event_id: Uuid,
    pub identifier: String,
    pub question: Json<I18nString>,
    #[sqlx(rename = "type")]
    pub question_type: QuestionType,
    pub position: i32,
}
