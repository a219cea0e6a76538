pub mod stage_link;
