//! Fixed tables of user-overridable fields.
//!
//! Each entity type has an explicit enum of the fields a user may shadow
//! with an override. Anything not listed (ids, `post_url`, `is_legend`,
//! variants, ...) always comes from the canonical record.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Card, CardSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is not overridable on a {entity}")]
    InvalidField { entity: EntityKind, field: String },
    #[error("Invalid value for {what}: '{value}' ({reason})")]
    InvalidValue {
        what: String,
        value: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn invalid_value(
        what: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            what: what.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// ── Entity Kind ─────────────────────────────────────────────────────────────

/// The two override namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    CardSet,
    Card,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CardSet => "card_set",
            Self::Card => "card",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s {
            "card_set" | "set" => Some(Self::CardSet),
            "card" => Some(Self::Card),
            _ => None,
        }
    }

    /// Names of all overridable fields, in table order.
    pub fn field_names(&self) -> Vec<&'static str> {
        match self {
            Self::CardSet => SetField::ALL.iter().map(|f| f.as_str()).collect(),
            Self::Card => CardField::ALL.iter().map(|f| f.as_str()).collect(),
        }
    }

    /// Check that `field_name` is overridable and that `value` fits the
    /// field's type. Returns the canonical static field name.
    pub fn validate(
        &self,
        field_name: &str,
        value: Option<&str>,
    ) -> Result<&'static str, ValidationError> {
        match self {
            Self::CardSet => {
                let field = SetField::parse(field_name)?;
                field.check_value(value)?;
                Ok(field.as_str())
            }
            Self::Card => {
                let field = CardField::parse(field_name)?;
                field.check_value(value)?;
                Ok(field.as_str())
            }
        }
    }

    /// Check only that `field_name` is in this entity's table.
    pub fn validate_field(&self, field_name: &str) -> Result<&'static str, ValidationError> {
        match self {
            Self::CardSet => SetField::parse(field_name).map(|f| f.as_str()),
            Self::Card => CardField::parse(field_name).map(|f| f.as_str()),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardSet => f.write_str("card set"),
            Self::Card => f.write_str("card"),
        }
    }
}

// ── Value Kinds ─────────────────────────────────────────────────────────────

/// How an override's string value maps onto the record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Required text; `null` clears to `""`.
    Text,
    /// Optional text; `null` clears to absent.
    OptionalText,
    /// Non-negative integer; `null` clears to `0`.
    Count,
    /// Optional integer; `null` clears to absent.
    OptionalInteger,
}

impl ValueKind {
    pub fn check(&self, field: &str, value: Option<&str>) -> Result<(), ValidationError> {
        match (self, value) {
            (Self::Count, Some(v)) => parse_count(field, v).map(|_| ()),
            (Self::OptionalInteger, Some(v)) => parse_integer(field, v).map(|_| ()),
            _ => Ok(()),
        }
    }
}

fn parse_count(field: &str, value: &str) -> Result<i64, ValidationError> {
    let n: i64 = value
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_value(field, value, "expected an integer"))?;
    if n < 0 {
        return Err(ValidationError::invalid_value(
            field,
            value,
            "must not be negative",
        ));
    }
    Ok(n)
}

fn parse_integer(field: &str, value: &str) -> Result<i32, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_value(field, value, "expected an integer"))
}

// ── Field Traits ────────────────────────────────────────────────────────────

/// A field enum backed by a constant table.
pub trait OverridableField: Copy + Sized + 'static {
    const ENTITY: EntityKind;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
    fn value_kind(self) -> ValueKind;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    fn parse(name: &str) -> Result<Self, ValidationError> {
        Self::from_name(name).ok_or_else(|| ValidationError::InvalidField {
            entity: Self::ENTITY,
            field: name.to_string(),
        })
    }

    fn check_value(self, value: Option<&str>) -> Result<(), ValidationError> {
        self.value_kind().check(self.as_str(), value)
    }
}

/// A canonical record whose fields can be shadowed by overrides.
pub trait Overridable: Clone {
    type Field: OverridableField;

    fn entity_id(&self) -> &str;

    /// Current value of `field`, rendered the way override rows store it.
    fn field_value(&self, field: Self::Field) -> Option<String>;

    /// Replace `field` with an override value (`None` clears it).
    fn set_field(&mut self, field: Self::Field, value: Option<&str>)
        -> Result<(), ValidationError>;
}

// ── Card Set Fields ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SetField {
    SetNameJp,
    SetNameZh,
    ProductType,
    ReleaseDate,
    TotalCards,
    RarityDistribution,
}

impl OverridableField for SetField {
    const ENTITY: EntityKind = EntityKind::CardSet;
    const ALL: &'static [Self] = &[
        Self::SetNameJp,
        Self::SetNameZh,
        Self::ProductType,
        Self::ReleaseDate,
        Self::TotalCards,
        Self::RarityDistribution,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::SetNameJp => "set_name_jp",
            Self::SetNameZh => "set_name_zh",
            Self::ProductType => "product_type",
            Self::ReleaseDate => "release_date",
            Self::TotalCards => "total_cards",
            Self::RarityDistribution => "rarity_distribution",
        }
    }

    fn value_kind(self) -> ValueKind {
        match self {
            Self::SetNameJp | Self::SetNameZh | Self::ProductType => ValueKind::Text,
            Self::ReleaseDate | Self::RarityDistribution => ValueKind::OptionalText,
            Self::TotalCards => ValueKind::Count,
        }
    }
}

impl Overridable for CardSet {
    type Field = SetField;

    fn entity_id(&self) -> &str {
        &self.set_id
    }

    fn field_value(&self, field: SetField) -> Option<String> {
        match field {
            SetField::SetNameJp => Some(self.set_name_jp.clone()),
            SetField::SetNameZh => Some(self.set_name_zh.clone()),
            SetField::ProductType => Some(self.product_type.clone()),
            SetField::ReleaseDate => self.release_date.clone(),
            SetField::TotalCards => Some(self.total_cards.to_string()),
            SetField::RarityDistribution => self.rarity_distribution.clone(),
        }
    }

    fn set_field(&mut self, field: SetField, value: Option<&str>) -> Result<(), ValidationError> {
        let text = || value.unwrap_or_default().to_string();
        match field {
            SetField::SetNameJp => self.set_name_jp = text(),
            SetField::SetNameZh => self.set_name_zh = text(),
            SetField::ProductType => self.product_type = text(),
            SetField::ReleaseDate => self.release_date = value.map(str::to_string),
            SetField::TotalCards => {
                self.total_cards = match value {
                    Some(v) => parse_count(field.as_str(), v)?,
                    None => 0,
                }
            }
            SetField::RarityDistribution => {
                self.rarity_distribution = value.map(str::to_string)
            }
        }
        Ok(())
    }
}

// ── Card Fields ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardField {
    NameJp,
    NameZh,
    CardType,
    Attribute,
    MonsterType,
    Level,
    Atk,
    Defense,
    SummonCondition,
    Condition,
    Effect,
    ContinuousEffect,
}

impl OverridableField for CardField {
    const ENTITY: EntityKind = EntityKind::Card;
    const ALL: &'static [Self] = &[
        Self::NameJp,
        Self::NameZh,
        Self::CardType,
        Self::Attribute,
        Self::MonsterType,
        Self::Level,
        Self::Atk,
        Self::Defense,
        Self::SummonCondition,
        Self::Condition,
        Self::Effect,
        Self::ContinuousEffect,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::NameJp => "name_jp",
            Self::NameZh => "name_zh",
            Self::CardType => "card_type",
            Self::Attribute => "attribute",
            Self::MonsterType => "monster_type",
            Self::Level => "level",
            Self::Atk => "atk",
            Self::Defense => "defense",
            Self::SummonCondition => "summon_condition",
            Self::Condition => "condition",
            Self::Effect => "effect",
            Self::ContinuousEffect => "continuous_effect",
        }
    }

    fn value_kind(self) -> ValueKind {
        match self {
            Self::NameJp | Self::NameZh | Self::CardType => ValueKind::Text,
            Self::Level => ValueKind::OptionalInteger,
            _ => ValueKind::OptionalText,
        }
    }
}

impl Overridable for Card {
    type Field = CardField;

    fn entity_id(&self) -> &str {
        &self.card_id
    }

    fn field_value(&self, field: CardField) -> Option<String> {
        match field {
            CardField::NameJp => Some(self.name_jp.clone()),
            CardField::NameZh => Some(self.name_zh.clone()),
            CardField::CardType => Some(self.card_type.clone()),
            CardField::Attribute => self.attribute.clone(),
            CardField::MonsterType => self.monster_type.clone(),
            CardField::Level => self.level.map(|l| l.to_string()),
            CardField::Atk => self.atk.clone(),
            CardField::Defense => self.defense.clone(),
            CardField::SummonCondition => self.summon_condition.clone(),
            CardField::Condition => self.condition.clone(),
            CardField::Effect => self.effect.clone(),
            CardField::ContinuousEffect => self.continuous_effect.clone(),
        }
    }

    fn set_field(&mut self, field: CardField, value: Option<&str>) -> Result<(), ValidationError> {
        let text = || value.unwrap_or_default().to_string();
        let optional = || value.map(str::to_string);
        match field {
            CardField::NameJp => self.name_jp = text(),
            CardField::NameZh => self.name_zh = text(),
            CardField::CardType => self.card_type = text(),
            CardField::Attribute => self.attribute = optional(),
            CardField::MonsterType => self.monster_type = optional(),
            CardField::Level => {
                self.level = match value {
                    Some(v) => Some(parse_integer(field.as_str(), v)?),
                    None => None,
                }
            }
            CardField::Atk => self.atk = optional(),
            CardField::Defense => self.defense = optional(),
            CardField::SummonCondition => self.summon_condition = optional(),
            CardField::Condition => self.condition = optional(),
            CardField::Effect => self.effect = optional(),
            CardField::ContinuousEffect => self.continuous_effect = optional(),
        }
        Ok(())
    }
}
