/// Errors raised when an animation component is built from invalid settings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnimError {
    #[error("emitter needs at least one particle")]
    EmptyPool,
    #[error("emitter {field} must be positive and finite, got {value}")]
    InvalidEmitterParam { field: &'static str, value: f32 },
    #[error("sprite sheet grid must be at least 1x1, got {columns}x{rows}")]
    EmptyGrid { columns: u32, rows: u32 },
    #[error("sprite sheet has {cells} cells but {frames} frames were requested")]
    TooManyFrames { frames: u32, cells: u32 },
    #[error("start frame {frame} is outside 0..{total}")]
    StartFrameOutOfRange { frame: u32, total: u32 },
    #[error("frame duration must be positive and finite, got {0}")]
    InvalidFrameDuration(f32),
    #[error("uv inset {inset} collapses a {columns}x{rows} cell")]
    InsetTooLarge { inset: f32, columns: u32, rows: u32 },
}
