// API path constants for the management and per-member surfaces

pub mod management_path {
    /// Prefix of every management call: `<hostBase>/management/<action>`
    pub const PREFIX: &str = "management";

    pub const LIST: &str = "list";
    pub const SPAWN: &str = "spawn";
    pub const SPAWN_BOOTSTRAP: &str = "spawnBootstrap";
    pub const KILL_ALL: &str = "killall";
}

pub mod member_path {
    /// Segment between the worker id and the action: `<hostBase>/<workerId>/api/<action>`
    pub const API: &str = "api";

    pub const QUERY: &str = "query";
    pub const MODIFY: &str = "modify";
    pub const DEPART: &str = "depart";
    pub const OVERLAY: &str = "overlay";

    /// Query key meaning "all entries"
    pub const QUERY_ALL_KEY: &str = "*";
}
