mod read_op;
pub mod record;
mod write_op;

pub use record::DtoRecord;
