mod navigation_tests;
mod state_tests;
mod sync_tests;
