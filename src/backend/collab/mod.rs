//! Realtime Collaboration Module
//!
//! This module relays edit events between clients editing the same document.
//! Each document id names a room; a connected client joins the rooms of the
//! documents it has open and receives the changes other members emit.
//!
//! # Architecture
//!
//! - **`registry`** - `SessionRegistry`, the room membership maps and the
//!   outbound queue of every connected session
//! - **`relay`** - `ChangeRelay`, fan-out of one change to the other members
//!   of a room
//! - **`socket`** - the `GET /ws` upgrade handler and the per-connection
//!   event loop
//!
//! # Module Structure
//!
//! ```text
//! collab/
//! ├── mod.rs       - Module exports and documentation
//! ├── registry.rs  - Session and room membership tracking
//! ├── relay.rs     - Change fan-out
//! └── socket.rs    - WebSocket transport and room protocol
//! ```
//!
//! # Delivery model
//!
//! Changes are opaque JSON. The server never inspects, merges or stores
//! them. Delivery is best effort: every session has a bounded queue and a
//! recipient whose queue is full or closed loses that change. Per sender,
//! changes reach each recipient in the order they were sent; across senders
//! there is no ordering.
//!
//! # Access
//!
//! Joining a room requires view access to the document. Changes are relayed
//! only for rooms the sender joined with edit access.

/// Session and room membership tracking
pub mod registry;

/// Change fan-out
pub mod relay;

/// WebSocket transport
pub mod socket;

pub use registry::{SessionId, SessionRegistry, SessionSender};
pub use relay::{ChangeRelay, RelayOutcome};
pub use socket::{ws_handler, RoomSession};
