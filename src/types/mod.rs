pub mod columns;
pub mod dataset;
pub mod labels;
pub mod record;
