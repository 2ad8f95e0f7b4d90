pub mod greencloud;
