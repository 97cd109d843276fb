/*!
 * Admin patch protocol.
 *
 * Native counterpart of the console embedded in admin-enabled artifacts:
 * unlock with the artifact's secret, edit the live document, and save a
 * new artifact through the same marker contract.
 *
 * - `gate`: secret check, including the documented bypass
 * - `store`: versioned live document
 * - `session`: state machine and re-serialization
 */

pub mod gate;
pub mod session;
pub mod store;

pub use gate::{SecretGate, BYPASS_SECRET};
pub use session::{AdminSession, SaveMode, SessionState};
pub use store::{DocumentContent, DocumentStore};
