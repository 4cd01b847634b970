/// Default codec for input streams
pub const DEFAULT_CODEC: &str = "OPUS";
/// Default clock rate for input streams (Hz)
pub const DEFAULT_CLOCK_RATE: u32 = 48_000;
/// Default channel count for input streams
pub const DEFAULT_CHANNELS: u8 = 2;
/// Default RTP payload type for input streams
pub const DEFAULT_PAYLOAD_TYPE: u8 = 97;
/// Default session bandwidth (kbps)
pub const DEFAULT_BANDWIDTH: u32 = 128;
/// Default retry ceiling for session handshake waits
pub const DEFAULT_HANDSHAKE_RETRIES: u32 = 60;
/// Default interval between handshake polls (milliseconds)
pub const DEFAULT_HANDSHAKE_INTERVAL_MS: u64 = 100;
