//! Element Types
//!
//! HTML element interfaces as a flat tag enumeration. Each interface has an
//! optional parent interface, so "is this node an `X`" is answered by walking
//! the chain instead of a runtime type check.

use serde::{Deserialize, Serialize};

/// HTML element interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Base interface, matched by every element
    #[serde(alias = "*", alias = "htmlelement")]
    Element,
    Anchor,
    Area,
    Audio,
    Base,
    Body,
    Br,
    Button,
    Canvas,
    Data,
    DataList,
    Details,
    Dialog,
    Div,
    DList,
    Embed,
    FieldSet,
    Form,
    Head,
    Heading,
    Hr,
    Html,
    IFrame,
    Image,
    Input,
    Label,
    Legend,
    Li,
    Link,
    Map,
    /// Shared parent of `Audio` and `Video`
    Media,
    Menu,
    Meta,
    Meter,
    Mod,
    Object,
    OList,
    OptGroup,
    Option,
    Output,
    Paragraph,
    Picture,
    Pre,
    Progress,
    Quote,
    Script,
    Select,
    Slot,
    Source,
    Span,
    Style,
    Table,
    TableCaption,
    TableCell,
    TableCol,
    TableRow,
    TableSection,
    Template,
    TextArea,
    Time,
    Title,
    Track,
    UList,
    Unknown,
    Video,
}

impl ElementType {
    /// Map a tag name to its interface
    pub fn from_tag_name(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "a" => Self::Anchor,
            "area" => Self::Area,
            "audio" => Self::Audio,
            "base" => Self::Base,
            "body" => Self::Body,
            "br" => Self::Br,
            "button" => Self::Button,
            "canvas" => Self::Canvas,
            "data" => Self::Data,
            "datalist" => Self::DataList,
            "details" => Self::Details,
            "dialog" => Self::Dialog,
            "div" => Self::Div,
            "dl" => Self::DList,
            "embed" => Self::Embed,
            "fieldset" => Self::FieldSet,
            "form" => Self::Form,
            "head" => Self::Head,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Self::Heading,
            "hr" => Self::Hr,
            "html" => Self::Html,
            "iframe" => Self::IFrame,
            "img" => Self::Image,
            "input" => Self::Input,
            "label" => Self::Label,
            "legend" => Self::Legend,
            "li" => Self::Li,
            "link" => Self::Link,
            "map" => Self::Map,
            "menu" => Self::Menu,
            "meta" => Self::Meta,
            "meter" => Self::Meter,
            "ins" | "del" => Self::Mod,
            "object" => Self::Object,
            "ol" => Self::OList,
            "optgroup" => Self::OptGroup,
            "option" => Self::Option,
            "output" => Self::Output,
            "p" => Self::Paragraph,
            "picture" => Self::Picture,
            "pre" | "listing" | "xmp" => Self::Pre,
            "progress" => Self::Progress,
            "q" | "blockquote" => Self::Quote,
            "script" => Self::Script,
            "select" => Self::Select,
            "slot" => Self::Slot,
            "source" => Self::Source,
            "span" => Self::Span,
            "style" => Self::Style,
            "table" => Self::Table,
            "caption" => Self::TableCaption,
            "td" | "th" => Self::TableCell,
            "col" | "colgroup" => Self::TableCol,
            "tr" => Self::TableRow,
            "thead" | "tbody" | "tfoot" => Self::TableSection,
            "template" => Self::Template,
            "textarea" => Self::TextArea,
            "time" => Self::Time,
            "title" => Self::Title,
            "track" => Self::Track,
            "ul" => Self::UList,
            "video" => Self::Video,
            // Elements without a dedicated interface
            "section" | "article" | "aside" | "nav" | "header" | "footer" | "main" | "b" | "i"
            | "em" | "strong" | "small" | "code" | "figure" | "figcaption" | "summary" => {
                Self::Element
            }
            _ => Self::Unknown,
        }
    }

    /// Parent interface (`None` for the base interface)
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::Element => None,
            Self::Audio | Self::Video => Some(Self::Media),
            _ => Some(Self::Element),
        }
    }

    /// Check whether this interface is `other` or derives from it
    pub fn is_a(self, other: ElementType) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty == other {
                return true;
            }
            current = ty.parent();
        }
        false
    }

    /// Matched by every element
    pub fn is_universal(self) -> bool {
        self == Self::Element
    }

    /// Form controls carry a native `value` property
    pub fn has_value_property(self) -> bool {
        matches!(self, Self::Input | Self::TextArea | Self::Select | Self::Output)
    }
}
