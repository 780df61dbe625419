use serde::{Deserialize, Serialize};

/// The fixed set of categories a transaction can be filed under.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
pub enum Category {
    #[default]
    Food,
    Salary,
    Rent,
    Shopping,
    Entertainment,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Salary,
        Category::Rent,
        Category::Shopping,
        Category::Entertainment,
    ];
}
