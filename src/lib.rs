pub mod articulation;
pub mod batch;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fields;
pub mod record;

pub use articulation::{Action, ArticulationContract, ContractReport, ContractState, Step};
pub use batch::{decode_batch, Batch, BatchDecoder, BatchResult, LINE_DELIMITER};
pub use config::{split_header, DecoderConfig, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use decoder::{decode, decode_line, Decoded};
pub use encoder::{scale_velocity, Event, FrameEncoder, NoteEvent};
pub use error::*;
pub use fields::{parse_fields, ParsedFields, FIELD_DELIMITER};
pub use record::{ArticulationState, FrameRecord, RecordLayout, Rendering};

/// Decode an f0 source with an optional YAML header.
/// This is the main entry point for whole files.
pub fn decode_source(source: &str) -> Result<(DecoderConfig, BatchResult), F0Error> {
    let (config, body) = split_header(source)?;
    let config = config.unwrap_or_default();
    Ok((config, decode_with(body, &config)))
}

/// Decode a header-less buffer with an explicit configuration
pub fn decode_with(buffer: &str, config: &DecoderConfig) -> BatchResult {
    BatchDecoder::from_config(config).decode(buffer).to_result()
}

/// Render every record on its own line, in the debug text form.
pub fn render(records: &[FrameRecord], layout: RecordLayout) -> String {
    let mut text = String::new();
    for record in records {
        text.push_str(&record.render(layout).to_string());
        text.push('\n');
    }
    text
}
