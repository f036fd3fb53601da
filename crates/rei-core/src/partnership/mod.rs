pub mod joint_venture;
