pub mod group_assign;
pub mod group_create;
pub mod group_member_remove;
