//! Domain types exchanged with the REST service.
//!
//! Most payloads are passed through as [`serde_json::Value`]; only the
//! entities the client itself inspects or caches are typed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

/// A product category.
///
/// Fields other than `id` and `name` are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// The category identifier.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// The display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Any other field returned by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A payment method accepted by the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    /// The payment method identifier.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// The display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Any other field returned by the service.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A message sent to a trader by email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// Sender address.
    pub from_email: String,
    /// Sender name.
    pub from_name: String,
}

impl ContactForm {
    /// Creates a contact form.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        message: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            from_email: from_email.into(),
            from_name: from_name.into(),
        }
    }

    pub(crate) fn to_form(&self) -> Vec<(String, String)> {
        vec![
            ("subject".to_string(), self.subject.clone()),
            ("message".to_string(), self.message.clone()),
            ("from_email".to_string(), self.from_email.clone()),
            ("from_name".to_string(), self.from_name.clone()),
        ]
    }
}

/// Declares a closed set of path or query values with their wire names.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Returns the value sent to the service.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(Error::invalid_argument(format!(
                        concat!(stringify!($name), " must be one of {}, got '{}'"),
                        [$($wire),+].join(", "),
                        other
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Which side of a subscription to list.
    FollowType {
        /// Users subscribed to the given user.
        Followers => "followers",
        /// Users the given user is subscribed to.
        Following => "following",
    }
}

wire_enum! {
    /// Recommendation algorithm.
    RecommendationType {
        /// Based on the user's own preferences.
        Content => "content",
        /// Based on similar users.
        Collaborative => "collaborative",
    }
}

wire_enum! {
    /// Social network publication template.
    TemplateType {
        /// Message posted when an item is added.
        New => "new",
        /// Message posted for a promotion.
        Promotion => "promotion",
    }
}

wire_enum! {
    /// Sort key for item listings.
    ItemSort {
        /// Most reviewed first.
        Reviews => "reviews",
        /// By price.
        Price => "price",
        /// By available quantity.
        Quantity => "quantity",
        /// Most recently added first.
        AddedAt => "addedAt",
    }
}

/// Projection and ordering for item listings.
///
/// # Example
///
/// ```rust
/// use opentrade_api::rest::{ItemListOptions, ItemSort};
///
/// let options = ItemListOptions::default()
///     .fields("id,wording,price")
///     .order_by([ItemSort::Price, ItemSort::Reviews]);
///
/// assert_eq!(options.order_by_param(), "price,reviews");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemListOptions {
    fields: String,
    order_by: Vec<ItemSort>,
}

impl Default for ItemListOptions {
    fn default() -> Self {
        Self {
            fields: "all".to_string(),
            order_by: vec![ItemSort::Reviews],
        }
    }
}

impl ItemListOptions {
    /// Sets the projected fields.
    #[must_use]
    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Sets the sort keys, most significant first.
    #[must_use]
    pub fn order_by(mut self, order_by: impl IntoIterator<Item = ItemSort>) -> Self {
        self.order_by = order_by.into_iter().collect();
        self
    }

    /// Returns the projected fields.
    #[must_use]
    pub fn fields_param(&self) -> &str {
        &self.fields
    }

    /// Returns the comma-separated `orderBy` value.
    #[must_use]
    pub fn order_by_param(&self) -> String {
        self.order_by
            .iter()
            .map(ItemSort::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_keeps_unknown_fields() {
        let category: Category = serde_json::from_value(json!({
            "id": "5a1",
            "name": "Shoes",
            "icon": "shoe.png"
        }))
        .unwrap();

        assert_eq!(category.id, "5a1");
        assert_eq!(category.name.as_deref(), Some("Shoes"));
        assert_eq!(category.extra["icon"], "shoe.png");
    }

    #[test]
    fn test_numeric_ids_are_read_as_strings() {
        let payment: PaymentMethod = serde_json::from_value(json!({"id": 3})).unwrap();
        assert_eq!(payment.id, "3");
        assert!(payment.name.is_none());
    }

    #[test]
    fn test_category_without_id_is_rejected() {
        assert!(serde_json::from_value::<Category>(json!({"name": "x"})).is_err());
    }

    #[test]
    fn test_wire_enums_round_trip_names() {
        assert_eq!(FollowType::Following.as_str(), "following");
        assert_eq!("followers".parse::<FollowType>().unwrap(), FollowType::Followers);
        assert_eq!(RecommendationType::Collaborative.to_string(), "collaborative");
        assert_eq!("promotion".parse::<TemplateType>().unwrap(), TemplateType::Promotion);
    }

    #[test]
    fn test_wire_enum_rejects_unknown_value_case_sensitively() {
        let error = "Followers".parse::<FollowType>().unwrap_err();
        assert!(matches!(error, Error::InvalidArgument(ref m) if m.contains("followers, following")));
    }

    #[test]
    fn test_item_list_options_defaults() {
        let options = ItemListOptions::default();
        assert_eq!(options.fields_param(), "all");
        assert_eq!(options.order_by_param(), "reviews");
    }

    #[test]
    fn test_contact_form_field_names() {
        let form = ContactForm::new("Hi", "Is it available?", "a@b.c", "Ann").to_form();
        let keys: Vec<&str> = form.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["subject", "message", "from_email", "from_name"]);
    }
}
