use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = crate::error::FlowlogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self).map_err(|_| {
                    crate::error::FlowlogError::ValidationError(format!(
                        "invalid {}: {}",
                        stringify!($name),
                        s
                    ))
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Server-assigned board identifier
    BoardId
);
entity_id!(
    /// Server-assigned list identifier
    ListId
);
entity_id!(
    /// Server-assigned card identifier
    CardId
);
entity_id!(LabelId);
entity_id!(UserId);
entity_id!(ChecklistId);
entity_id!(ChecklistItemId);
