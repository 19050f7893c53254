use crate::models::review::ReviewRequest;

/// Upper bound on reply length communicated to the model. Not enforced on output.
pub const REPLY_CHAR_LIMIT: usize = 500;

/// System and user messages for one review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPrompts {
    pub system: String,
    pub user: String,
}

pub fn build_prompts(req: &ReviewRequest) -> ReplyPrompts {
    ReplyPrompts {
        system: system_prompt(),
        user: user_prompt(req),
    }
}

fn system_prompt() -> String {
    format!(
        "You are a professional hotel manager with excellent customer service skills, \
replying to guest reviews on behalf of your property in a warm, professional and personal tone.

Every reply must:
1. Thank the guest for their feedback.
2. Reference specific details from the review, such as things they praised or issues they raised.
3. Acknowledge or apologize for any shortfalls, if applicable.
4. Mention actions taken or improvements planned, when relevant.
5. Stay under {REPLY_CHAR_LIMIT} characters in total.

Response format:

Dear Guest,

[Your tailored response text here.]

Warm Regards,
[Manager name]
[Manager title]
[Property name]"
    )
}

fn user_prompt(req: &ReviewRequest) -> String {
    format!(
        "Write a personalized response to the following guest review of {property}. \
Thank the guest, address the specific points they raised, and close with the sign-off below exactly as written.

Guest Review:
{review}

Manager name: {name}
Manager title: {title}
Property name: {property}

Sign-off:
Warm Regards,
{name}
{title}
{property}",
        property = req.property_name,
        review = req.review_text,
        name = req.user_name,
        title = req.user_title,
    )
}
