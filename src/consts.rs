use std::time::Duration;

pub const GRAPH_API_BASE_URL: &str = "https://graph.facebook.com";

/// Reply sent back when the inbound message is plain text.
pub const TEXT_PROMPT_REPLY: &str =
    "Recebi ✅ Me envie sua fatura (PDF ou imagem) e em 1 frase sua maior dor financeira no momento.";

/// Reply sent back when the inbound message is any non-text attachment.
pub const ATTACHMENT_ACK_REPLY: &str =
    "Recebi seu arquivo!✅ Já vou analisar e te retorno em breve.⏳";

/// WhatsApp gives webhook receivers 20 seconds to respond; the outbound
/// send gets the same bound so a stuck call cannot hold the request open.
pub const SEND_MESSAGE_TIMEOUT: Duration = Duration::from_secs(20);

pub const SIGNATURE_HEADER_NAME: &str = "X-Hub-Signature-256";
