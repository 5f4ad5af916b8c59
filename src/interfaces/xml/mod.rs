pub mod batch_writer;
