use crate::error::BoxError;
use crate::request::RequestContext;
use crate::response::ResponseContext;
use std::fmt;

/// Application code producing a response.
///
/// A handler only records what the response should be, it never finalizes it. Returning an
/// error turns the response into a 500 error envelope.
pub trait ResponseHandler: Send + Sync {
    fn handle(&self, req: &RequestContext, res: &mut ResponseContext) -> Result<(), BoxError>;
}

/// a holder which turns any matching `Fn` into a [`ResponseHandler`]
pub struct FnHandler<F> {
    f: F,
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

impl<F> FnHandler<F>
where
    F: Fn(&RequestContext, &mut ResponseContext) -> Result<(), BoxError> + Send + Sync,
{
    fn new(f: F) -> Self {
        Self { f }
    }
}

/// Creates a [`ResponseHandler`] from a function or a closure.
///
/// # Example
/// ```
/// use micro_reply::{handler_fn, ResponseHandler};
///
/// let handler = handler_fn(|_req, res| {
///     res.send("this is a string")?;
///     Ok(())
/// });
/// # fn assert_handler<H: ResponseHandler>(_: &H) {}
/// # assert_handler(&handler);
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&RequestContext, &mut ResponseContext) -> Result<(), BoxError> + Send + Sync,
{
    FnHandler::new(f)
}

impl<F> ResponseHandler for FnHandler<F>
where
    F: Fn(&RequestContext, &mut ResponseContext) -> Result<(), BoxError> + Send + Sync,
{
    fn handle(&self, req: &RequestContext, res: &mut ResponseContext) -> Result<(), BoxError> {
        (self.f)(req, res)
    }
}
