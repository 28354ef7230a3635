//! Shared application-wide constants.
//! Centralizes the reference placement policy and tweakable values used across
//! UI rendering and interactions. All lengths are centimeters unless noted.

// Plate dimension bounds
/// Smallest plate width accepted by the plate editor.
pub const PLATE_WIDTH_MIN: f64 = 20.0;
/// Largest plate width accepted by the plate editor.
pub const PLATE_WIDTH_MAX: f64 = 300.0;
/// Smallest plate height accepted by the plate editor.
pub const PLATE_HEIGHT_MIN: f64 = 30.0;
/// Largest plate height accepted by the plate editor.
pub const PLATE_HEIGHT_MAX: f64 = 128.0;
/// Both plate dimensions must reach this before the plate can host sockets.
pub const MIN_SOCKET_PLATE: f64 = 40.0;

// Placement clearances
/// Minimum distance between a socket group and any plate edge.
pub const EDGE_MIN: f64 = 3.0;
/// Minimum distance between two socket groups on the same plate.
pub const GROUP_GAP: f64 = 4.0;

// Sockets
/// Side length of a single (square) socket.
pub const SOCKET_SIZE: f64 = 7.0;
/// Gap between consecutive sockets inside one group.
pub const SOCKET_GAP: f64 = 0.2;
/// Largest number of sockets in one group.
pub const MAX_SOCKETS_PER_GROUP: u8 = 5;
/// Price of one socket cut-out in euros.
pub const SOCKET_PRICE_EUR: f64 = 20.0;

// Plates
/// Horizontal gap between consecutive plates in the canvas row.
pub const PLATE_ROW_GAP: f64 = 2.0;
/// Size of a plate appended with "add plate".
pub const NEW_PLATE_SIZE: (f64, f64) = (100.0, 50.0);
/// Plates present in a fresh project.
pub const INITIAL_PLATES: [(f64, f64); 2] = [(151.5, 36.8), (200.0, 100.0)];

// Layout guards
/// Lower bound for the scale when converting pixel deltas back to centimeters.
pub const MIN_DRAG_SCALE: f64 = 0.000_001;
/// Lower bound for the scale when converting padding back to centimeters.
pub const MIN_PADDING_SCALE: f64 = 0.0001;

// Canvas drawing (screen pixels)
/// Gap between a plate's bottom edge and its dimension label.
pub const DIM_LABEL_OFFSET: f32 = 6.0;
/// Gap between a group's top edge and the invalid-reason bubble.
pub const REASON_BUBBLE_OFFSET: f32 = 8.0;
/// Radius of the anchor dot drawn while dragging.
pub const ANCHOR_DOT_RADIUS: f32 = 4.0;
/// Opacity multiplier for groups that are not the active one.
pub const IDLE_GROUP_OPACITY: f32 = 0.4;
/// Margin kept free around the plates inside the canvas.
pub const CANVAS_GUTTER: f32 = 24.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 100;

/// Key under which the application state is persisted.
pub const STORAGE_KEY: &str = "plate-socket-gen:v1";

/// Tolerance for boundary comparisons in placement checks.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
