//=========================================================================
// Global Engine State
//=========================================================================
//
// The context object shared by every state callback. Replaces
// process-wide statics for layout values, input and stack requests.
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
