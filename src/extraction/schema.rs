// schema.rs
use serde_json::Value;

pub const PROPERTY_ACTIONS: &[&str] = &["BUY", "SELL", "RENT"];

pub const PROPERTY_TYPES: &[&str] = &[
    "House",
    "Unit",
    "Apartment",
    "Studio",
    "Townhouse",
    "Land",
    "Villa",
    "Rural",
    "All",
];

pub const CITIES: &[&str] = &[
    "Sydney",
    "Melbourne",
    "Hobart",
    "Darwin",
    "Adelaide",
    "Perth",
    "Brisbane",
    "Canberra",
];

pub const STATES: &[&str] = &[
    "Australian Capital Territory",
    "New South Wales",
    "Northern Territory",
    "Queensland",
    "South Australia",
    "Tasmania",
    "Victoria",
    "Western Australia",
];

/// Shape of a field's value once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One of a fixed list, matched case-insensitively.
    Choice(&'static [&'static str]),
    Text,
    Integer,
    /// `{"Min": int|null, "Max": int|null}`
    Range,
    /// List of strings.
    List,
}

impl FieldKind {
    /// Type name shown to the model in the format instructions.
    pub fn type_hint(&self) -> &'static str {
        match self {
            FieldKind::Choice(_) | FieldKind::Text => "string",
            FieldKind::Integer => "integer",
            FieldKind::Range => "object",
            FieldKind::List => "array",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Null,
    Text(&'static str),
    EmptyList,
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Null => Value::Null,
            FieldDefault::Text(s) => Value::String(s.to_string()),
            FieldDefault::EmptyList => Value::Array(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

const PROPERTY_QUERY_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "PropertyAction",
        description: "Whether the user wants to buy, sell or rent. Answer \"BUY\", \"SELL\" or \"RENT\". \
                      If the query does not say, answer \"BUY\".",
        kind: FieldKind::Choice(PROPERTY_ACTIONS),
        default: FieldDefault::Text("BUY"),
    },
    FieldSpec {
        name: "propertyType",
        description: "The kind of property, one of [House, Unit, Apartment, Studio, Townhouse, Land, Villa, Rural]. \
                      If the query does not say, answer \"All\".",
        kind: FieldKind::Choice(PROPERTY_TYPES),
        default: FieldDefault::Text("All"),
    },
    FieldSpec {
        name: "city",
        description: "The city, one of [Sydney, Melbourne, Hobart, Darwin, Adelaide, Perth, Brisbane, Canberra]. \
                      If none is mentioned, answer null.",
        kind: FieldKind::Choice(CITIES),
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "houseNumber",
        description: "The house or apartment number being searched for. If none is mentioned, answer null.",
        kind: FieldKind::Text,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "street",
        description: "The street name being searched for. If none is mentioned, answer null.",
        kind: FieldKind::Text,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "suburb",
        description: "The Australian suburb being searched for. If none is mentioned, answer null.",
        kind: FieldKind::Text,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "state",
        description: "One state or territory from [Australian Capital Territory, New South Wales, Northern Territory, \
                      Queensland, South Australia, Tasmania, Victoria, Western Australia]. If none is mentioned, answer null.",
        kind: FieldKind::Choice(STATES),
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "postcode",
        description: "The Australian postcode being searched for. If none is mentioned, answer null.",
        kind: FieldKind::Text,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "Bedrooms",
        description: "Number of bedrooms as an integer. If none is mentioned, answer null.",
        kind: FieldKind::Integer,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "Bathrooms",
        description: "Number of bathrooms as an integer. If none is mentioned, answer null.",
        kind: FieldKind::Integer,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "CarSpaces",
        description: "Number of car spaces or parking spots as an integer. If none is mentioned, answer null.",
        kind: FieldKind::Integer,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "PriceRange",
        description: "The price range as an object {\"Min\": integer, \"Max\": integer}; use null for an open end. \
                      If no price is mentioned, answer null.",
        kind: FieldKind::Range,
        default: FieldDefault::Null,
    },
    FieldSpec {
        name: "Features",
        description: "Requested features such as swimming pool or gym, as a JSON list of strings. \
                      If none are mentioned, answer [].",
        kind: FieldKind::List,
        default: FieldDefault::EmptyList,
    },
];

/// Ordered field list the model is asked to fill in.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionSchema {
    fields: &'static [FieldSpec],
}

impl ExtractionSchema {
    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    /// The 13-field real-estate search schema.
    pub const fn property_query() -> Self {
        Self::new(PROPERTY_QUERY_FIELDS)
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Text appended to the prompt describing the exact reply shape.
    pub fn format_instructions(&self) -> String {
        let mut lines = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            lines.push(format!(
                "\t\"{}\": {}  // {}",
                field.name,
                field.kind.type_hint(),
                field.description
            ));
        }

        format!(
            "The output should be a markdown code snippet formatted in the following schema, \
             including the leading and trailing \"```json\" and \"```\":\n\n\
             ```json\n{{\n{}\n}}\n```",
            lines.join("\n")
        )
    }
}
