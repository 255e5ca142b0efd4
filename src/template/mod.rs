//! Template persistence codec and configuration preview

mod codec;
mod payload;
mod preview;
mod record;

pub use codec::{decode, encode, encode_draft, ConfigurationDraft, Template};
pub use payload::PagePayload;
pub use preview::render_preview;
pub use record::{AddonRecord, NodePoolRecord, TemplatePatch, TemplateRecord};
