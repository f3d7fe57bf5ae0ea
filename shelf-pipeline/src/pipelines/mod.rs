pub mod batch_view;
