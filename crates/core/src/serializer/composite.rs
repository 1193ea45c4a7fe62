//! Inlining a resource as a full object, cut by the seen-set.

use tracing::{debug, trace};

use crate::error::SerializeError;
use crate::schema::{DeclarationKind, PropertyDeclaration};
use crate::sink::TextSink;
use crate::value::{NodeId, Value};

use super::context::SerializationContext;
use super::dispatch;
use super::relationship::reference_text;

/// Name of the type discriminator member, always written first.
pub const CLASS_PROPERTY: &str = "$class";

/// Inline `node`, or write a back-reference if it was already inlined during
/// this call. `via` is the property the node was reached through, `None`
/// for the root.
pub(crate) fn inline<S: TextSink + ?Sized>(
    ctx: &mut SerializationContext<'_, S>,
    node: NodeId,
    via: Option<&PropertyDeclaration>,
) -> Result<(), SerializeError> {
    let graph = ctx.graph;
    let schema = ctx.schema;

    let resource = match graph.resource(node) {
        Some(resource) => resource,
        None => {
            let value = Value::Resource(node);
            return Err(match via {
                Some(property) => ctx.unrecognised(property, &value),
                None => SerializeError::UnrecognisedValue {
                    property: "$root".to_string(),
                    found: value.describe(graph),
                },
            });
        }
    };
    let identifier = &resource.identifier;
    let fqi = identifier.fully_qualified();

    if ctx.is_seen(&fqi) {
        trace!(resource = %fqi, depth = ctx.depth(), "back-reference");
        ctx.sink.string(&reference_text(via, identifier));
        return Ok(());
    }

    let declaration = schema.type_declaration(&identifier.namespace, &identifier.type_name)?;
    if declaration.kind == DeclarationKind::Enum {
        let value = Value::Resource(node);
        return Err(match via {
            Some(property) => ctx.unrecognised(property, &value),
            None => SerializeError::UnrecognisedValue {
                property: "$root".to_string(),
                found: value.describe(graph),
            },
        });
    }

    // Marked before descending so a self-reference is cut on re-entry.
    ctx.mark_seen(fqi);
    ctx.enter(identifier)?;
    debug!(resource = %identifier, depth = ctx.depth(), "inlining");

    ctx.sink.open_object();
    ctx.sink.property_name(CLASS_PROPERTY);
    ctx.sink.string(&declaration.fully_qualified_name());

    for property in &declaration.properties {
        match resource.fields.get(&property.name) {
            Some(value) => {
                ctx.sink.property_name(&property.name);
                dispatch::dispatch(ctx, value, property)?;
            }
            None if declaration.identified_by.as_deref() == Some(property.name.as_str()) => {
                ctx.sink.property_name(&property.name);
                ctx.sink.string(&identifier.id);
            }
            None => {}
        }
    }

    ctx.sink.close_object();
    ctx.leave();
    Ok(())
}
