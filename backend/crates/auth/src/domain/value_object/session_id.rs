use kernel::id::Id;

pub struct SessionMarker;
pub type SessionId = Id<SessionMarker>;
