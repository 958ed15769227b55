pub mod export_roundtrip;
pub mod redaction_flow;
