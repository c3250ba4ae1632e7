//! Configuration and limits for the WebSocket server.

/// Resource limits applied while reading from clients.
///
/// These limits keep a single misbehaving peer from forcing unbounded
/// allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum payload size of a single frame in bytes.
    ///
    /// Default: 16 MB (16 * 1024 * 1024)
    pub max_frame_size: usize,

    /// Maximum size of the HTTP upgrade request head in bytes.
    ///
    /// Default: 8 KB (8192)
    pub max_handshake_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_frame_size: 16 * 1024 * 1024, // 16 MB
            max_handshake_size: 8192,
        }
    }
}

impl Limits {
    /// Create new limits with custom values.
    #[must_use]
    pub const fn new(max_frame_size: usize, max_handshake_size: usize) -> Self {
        Self {
            max_frame_size,
            max_handshake_size,
        }
    }

    /// Validate that an announced frame length is within limits.
    ///
    /// The length is taken as `u64` because that is what the wire carries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameTooLarge`](crate::Error::FrameTooLarge) if `size` exceeds the configured maximum.
    pub const fn check_frame_size(&self, size: u64) -> Result<(), crate::Error> {
        if size > self.max_frame_size as u64 {
            Err(crate::Error::FrameTooLarge {
                size,
                max: self.max_frame_size,
            })
        } else {
            Ok(())
        }
    }
}

/// Listening socket and per-connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to bind. `0` lets the OS pick one.
    ///
    /// Default: 8080
    pub port: u16,

    /// Bind an IPv4 socket instead of an IPv6 one.
    ///
    /// Default: false
    pub force_ipv4: bool,

    /// Maximum number of pending, not yet accepted connections.
    ///
    /// Default: `SOMAXCONN`
    pub backlog: i32,

    /// Set `SO_REUSEADDR` before binding.
    ///
    /// Default: true
    pub reuse_address: bool,

    /// Read buffer size for each session (in bytes).
    ///
    /// Default: 8 KB (8192)
    pub read_buffer_size: usize,

    /// Resource limits.
    pub limits: Limits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            force_ipv4: false,
            backlog: libc::SOMAXCONN,
            reuse_address: true,
            read_buffer_size: 8192,
            limits: Limits::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port to bind.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bind IPv4 instead of IPv6.
    #[must_use]
    pub const fn with_force_ipv4(mut self, force_ipv4: bool) -> Self {
        self.force_ipv4 = force_ipv4;
        self
    }

    /// Set the listen backlog.
    #[must_use]
    pub const fn with_backlog(mut self, backlog: i32) -> Self {
        self.backlog = backlog;
        self
    }

    /// Enable or disable `SO_REUSEADDR`.
    #[must_use]
    pub const fn with_reuse_address(mut self, reuse: bool) -> Self {
        self.reuse_address = reuse;
        self
    }

    /// Set read buffer size.
    #[must_use]
    pub const fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set custom limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}
