mod broadcast_change_feed;
mod pg_change_feed;

pub use broadcast_change_feed::BroadcastChangeFeed;
pub use pg_change_feed::{CHANGE_CHANNEL, ChangeNotice, PgChangeFeed};
