use tracing::debug;

use crate::{
    clients::kafka::{PublishReceipt, Publisher},
    error::DispatchResult,
    models::{notification::Notification, request::DispatchRequest, user::Directory},
};

/// Runs one request through parse, resolve, build and publish.
///
/// The first failing step ends the dispatch; nothing is published unless
/// both users resolve.
pub async fn dispatch_notification(
    directory: &Directory,
    publisher: &dyn Publisher,
    request: DispatchRequest,
) -> DispatchResult<PublishReceipt> {
    let parsed = request.parse()?;

    let from_user = directory.find(parsed.from_id)?;
    let to_user = directory.find(parsed.to_id)?;

    debug!(
        from_id = parsed.from_id,
        to_id = parsed.to_id,
        "Resolved notification parties"
    );

    let notification = Notification::build(from_user, to_user, parsed.message);
    let payload = notification.to_bytes()?;

    let key = parsed.from_id.to_string();
    let receipt = publisher.publish(&key, &payload).await?;

    debug!(
        from_id = parsed.from_id,
        to_id = parsed.to_id,
        partition = receipt.partition,
        offset = receipt.offset,
        "Notification published"
    );

    Ok(receipt)
}
