//! Value dispatch: match a runtime value against its declared property.

use crate::error::SerializeError;
use crate::schema::{DeclarationKind, PropertyDeclaration};
use crate::sink::TextSink;
use crate::value::{Scalar, Value};

use super::composite;
use super::context::SerializationContext;
use super::relationship;

/// Write the value of one declared property.
pub(crate) fn dispatch<S: TextSink + ?Sized>(
    ctx: &mut SerializationContext<'_, S>,
    value: &Value,
    property: &PropertyDeclaration,
) -> Result<(), SerializeError> {
    if property.is_relationship {
        return relationship::visit_relationship_property(ctx, value, property);
    }

    match value {
        Value::Array(items) if property.is_array => {
            ctx.sink.open_array();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    ctx.sink.separator();
                }
                dispatch_element(ctx, item, property)?;
            }
            ctx.sink.close_array();
            Ok(())
        }
        Value::Array(_) => Err(ctx.unrecognised(property, value)),
        _ if property.is_array => Err(ctx.unrecognised(property, value)),
        single => dispatch_element(ctx, single, property),
    }
}

/// A single (non-array) value under a non-relationship property.
fn dispatch_element<S: TextSink + ?Sized>(
    ctx: &mut SerializationContext<'_, S>,
    value: &Value,
    property: &PropertyDeclaration,
) -> Result<(), SerializeError> {
    match value {
        Value::Scalar(scalar) => {
            if !accepts_scalar(ctx, property)? {
                return Err(ctx.unrecognised(property, value));
            }
            write_scalar(ctx.sink, scalar);
            Ok(())
        }
        Value::Resource(node) => {
            if accepts_scalar(ctx, property)? {
                return Err(ctx.unrecognised(property, value));
            }
            composite::inline(ctx, *node, Some(property))
        }
        Value::Relationship(_) | Value::Array(_) => Err(ctx.unrecognised(property, value)),
    }
}

/// Primitive and enum properties hold scalars; every other declared type
/// holds a composite. Unknown target types propagate the registry error.
fn accepts_scalar<S: TextSink + ?Sized>(
    ctx: &SerializationContext<'_, S>,
    property: &PropertyDeclaration,
) -> Result<bool, SerializeError> {
    if property.is_primitive() {
        return Ok(true);
    }
    let target = ctx
        .schema
        .type_declaration(&property.target_namespace, &property.target_type_name)?;
    Ok(target.kind == DeclarationKind::Enum)
}

fn write_scalar<S: TextSink + ?Sized>(sink: &mut S, scalar: &Scalar) {
    match scalar {
        Scalar::Null => sink.null(),
        Scalar::Boolean(b) => sink.boolean(*b),
        Scalar::Integer(n) => sink.integer(*n),
        Scalar::Double(n) => sink.double(*n),
        Scalar::String(s) | Scalar::Enum(s) => sink.string(s),
    }
}
