pub mod like_kind;
