pub mod wkb;
