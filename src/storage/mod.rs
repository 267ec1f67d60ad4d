pub mod group_store;
