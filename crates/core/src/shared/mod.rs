pub mod constants;
pub mod media_blob;
pub mod output_name;
pub mod source_file;
