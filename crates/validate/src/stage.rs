//! Stage-by-stage payload checks.
//!
//! Each stage has one rules function. MIDDLEWARE composes INPUT through
//! [`Stage::prerequisite`]: the earlier stage runs first and its error is
//! returned as-is, so MIDDLEWARE-only rules are never reported for a payload
//! that is not yet a valid INPUT.

use chatwhisk_core::{Payload, Stage, ValidationError, linkage_field_for};

use crate::helper::validate;
use crate::shape::{Fields, ObjectShape, Validator};

type StageRules = fn(&Payload, &mut Fields<'_>);

fn rules_for(stage: Stage) -> StageRules {
    match stage {
        Stage::Input => input_rules,
        Stage::Middleware => middleware_rules,
        Stage::Output => output_rules,
        Stage::Store => store_rules,
    }
}

/// The channel linkage field, if the channel names one. An empty channel
/// would link through `_id`, which is already checked on its own.
fn linkage_for(channel: Option<&str>) -> Option<String> {
    channel.filter(|c| !c.is_empty()).map(linkage_field_for)
}

fn input_rules(_payload: &Payload, fields: &mut Fields<'_>) {
    fields.required_string("id");
    fields.required_object("input", |input| {
        input.required_string("channel");
        input.required_string("user");
        input.required("message");
    });
}

/// Rules added on top of INPUT; `input.channel` is known to be a string.
fn middleware_rules(payload: &Payload, fields: &mut Fields<'_>) {
    let linkage = linkage_for(payload.input_channel());
    fields.required_object("conversationcontext", |context| {
        context.required_object("user", |user| {
            user.required_string("_id");
            if let Some(linkage) = &linkage {
                user.required_string(linkage);
            }
        });
    });
    fields.optional_object("messagecontext", |_| {});
}

fn output_rules(payload: &Payload, fields: &mut Fields<'_>) {
    // Without a string output.channel there is no linkage field to check;
    // the output.channel violation itself is reported below.
    let linkage = linkage_for(payload.output_channel());
    fields.required_string("id");
    fields.required_object("conversationcontext", |context| {
        context.required_object("user", |user| {
            user.required_string("_id");
            if let Some(linkage) = &linkage {
                user.required_string(linkage);
            }
            user.optional_string("locale");
        });
    });
    fields.required_object("output", |output| {
        output.required_string("channel");
        output.required_string("user");
        output.required_string("intent");
        output.optional_string("locale");
        output.optional_object("context", |_| {});
        output.optional_string("message");
    });
}

fn store_rules(_payload: &Payload, fields: &mut Fields<'_>) {
    fields.required_string("id");
    fields.required_object("conversationcontext", |context| {
        context.required_object("user", |user| user.required_string("_id"));
    });
}

/// The validator for one stage's own rules (prerequisites not included).
pub fn stage_validator(payload: &Payload, stage: Stage) -> impl Validator + '_ {
    let rules = rules_for(stage);
    ObjectShape::new(payload.as_value(), move |fields: &mut Fields<'_>| {
        rules(payload, fields)
    })
}

/// Validate `payload` against a parsed stage, running its prerequisite first.
pub fn validate_stage(payload: &Payload, stage: Stage) -> Result<&Payload, ValidationError> {
    if let Some(earlier) = stage.prerequisite() {
        validate_stage(payload, earlier)?;
    }

    let message = format!("Payload is invalid for stage {stage}");
    validate(&stage_validator(payload, stage), Some(&message))?;

    tracing::trace!(stage = %stage, turn = payload.id().unwrap_or_default(), "Payload validated");
    Ok(payload)
}

/// Validate `payload` for the stage named by `stage`.
///
/// Fails with `INVALID_STAGE` for anything other than `INPUT`, `MIDDLEWARE`,
/// `OUTPUT` or `STORE`, before looking at the payload. On success the same
/// payload is handed back so calls can be chained.
pub fn validate_payload<'p>(payload: &'p Payload, stage: &str) -> Result<&'p Payload, ValidationError> {
    let stage: Stage = stage.parse()?;
    validate_stage(payload, stage)
}
