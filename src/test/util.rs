mod event_buffer;
mod mock;

pub(crate) use self::{
    event_buffer::EventBuffer,
    mock::{MockConnection, MockEstablisher, MockPool},
};
