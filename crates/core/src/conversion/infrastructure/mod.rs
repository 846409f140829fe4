pub mod blob_saver;
