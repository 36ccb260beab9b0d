//! LINE chat messages
//!
//! Messages are joined against a synthesized "contact or group" view: one row
//! per group, carrying its comma-joined member ids and member names, unioned
//! with one row per contact where the group-only columns are NULL. A non-NULL
//! `members` column therefore marks a group thread.

use rusqlite::{Connection, Statement};
use tracing::debug;

use super::{append_attachment_list, millis_to_seconds};
use crate::codes::MessageStatusCode;
use crate::cursor::{RecordStream, RowCursor};
use crate::defaults::DefaultsProvider;
use crate::error::Result;
use crate::models::{Address, CommunicationDirection, MessageRecord, Recipients, LINE_MESSAGE_TYPE};
use crate::schema::codes::EXCLUDED_ATTACHMENT_TYPE;

/// Separator used by `group_concat` for member ids and member names
pub const GROUP_DELIMITER: char = ',';

fn query() -> String {
    format!(
        "
        SELECT contact_list_with_groups.name         AS name,
               contact_list_with_groups.id           AS id,
               contact_list_with_groups.members      AS members,
               contact_list_with_groups.member_names AS member_names,
               CH.from_mid                           AS from_mid,
               C.server_name                         AS from_name,
               CH.content                            AS content,
               CH.created_time                       AS created_time,
               CH.attachement_type                   AS attachement_type,
               CH.attachement_local_uri              AS attachement_local_uri,
               CH.status                             AS status
        FROM   (SELECT G.name                    AS name,
                       group_members.id          AS id,
                       group_members.members     AS members,
                       group_members.member_names AS member_names
                FROM   (SELECT M.id                 AS id,
                               group_concat(M.m_id) AS members,
                               group_concat(IFNULL(replace(C.server_name, '{GROUP_DELIMITER}', ''), '')) AS member_names
                        FROM   membership AS M
                               JOIN contacts AS C
                                 ON M.m_id = C.m_id
                        GROUP  BY M.id) AS group_members
                       JOIN \"groups\" AS G
                         ON G.id = group_members.id
                UNION
                SELECT server_name,
                       m_id,
                       NULL,
                       NULL
                FROM   contacts) AS contact_list_with_groups
               JOIN chat_history AS CH
                 ON CH.chat_id = contact_list_with_groups.id
               LEFT JOIN contacts AS C
                 ON C.m_id = CH.from_mid
        WHERE  CH.attachement_type != {EXCLUDED_ATTACHMENT_TYPE}
        "
    )
}

/// Maps `chat_history` rows to [`MessageRecord`]s
pub struct MessagesExtractor<'a> {
    statement: Statement<'a>,
    defaults: &'a dyn DefaultsProvider,
}

impl<'a> MessagesExtractor<'a> {
    /// Prepare the message query against a `naver_line` database
    pub fn new(conn: &'a Connection, defaults: &'a dyn DefaultsProvider) -> Result<Self> {
        Ok(Self {
            statement: conn.prepare(&query())?,
            defaults,
        })
    }

    /// Run the query and stream one record per message
    pub fn records(&mut self) -> Result<RecordStream<'_, MessageRecord>> {
        let rows = self.statement.query([])?;
        Ok(RecordStream::new(rows, self.defaults, map_message))
    }
}

/// Split a group's parallel member id and member name lists into addresses.
///
/// Names are matched to ids by position. Commas are stripped from names
/// before they are joined, so a name never spans two positions. Members
/// without a matching name get an empty display name.
#[must_use]
pub fn parse_group_members(members: &str, member_names: Option<&str>) -> Vec<Address> {
    let mut names = member_names.unwrap_or_default().split(GROUP_DELIMITER);
    members
        .split(GROUP_DELIMITER)
        .map(|id| Address::new(id, names.next().unwrap_or_default()))
        .collect()
}

/// Content text, with the attachment reference appended when there is one
fn compose_body(content: Option<String>, attachment_uri: Option<String>) -> Option<String> {
    match attachment_uri.filter(|uri| !uri.is_empty()) {
        Some(uri) => Some(append_attachment_list(content.as_deref().unwrap_or_default(), &[&uri])),
        None => content,
    }
}

/// Map one joined message row
pub fn map_message(row: &dyn RowCursor, defaults: &dyn DefaultsProvider) -> Result<MessageRecord> {
    let direction = MessageStatusCode::from_raw(row.get_int("status")?).direction();
    let members = row.get_string("members")?;
    let chat_id = row.get_string("id")?;
    let chat_name = row.get_string("name")?;

    let from_address = match (direction, row.get_string("from_mid")?) {
        (CommunicationDirection::Incoming, Some(from_mid)) => {
            Some(Address::new(from_mid, row.get_string("from_name")?.unwrap_or_default()))
        }
        _ => defaults.from_address(),
    };

    let to_address = match (direction, members.as_deref()) {
        (CommunicationDirection::Outgoing, Some(members)) => Some(Recipients::Group(parse_group_members(
            members,
            row.get_string("member_names")?.as_deref(),
        ))),
        (CommunicationDirection::Outgoing, None) => Some(Recipients::Single(Address::new(
            chat_id.clone().unwrap_or_default(),
            chat_name.clone().unwrap_or_default(),
        ))),
        (CommunicationDirection::Incoming, _) => defaults.to_address(),
    };

    let created_time = row.get_string("created_time")?;
    let timestamp = millis_to_seconds(created_time.as_deref()).unwrap_or_else(|| {
        debug!(created_time = ?created_time, "Unparsable message time, using default");
        defaults.message_timestamp()
    });

    let thread_id = if members.is_some() {
        chat_id
    } else {
        let counterpart = chat_id.map(|id| Address::new(id, chat_name.unwrap_or_default()));
        defaults.thread_id(counterpart.as_ref())
    };

    Ok(MessageRecord {
        message_type: LINE_MESSAGE_TYPE.to_string(),
        direction,
        from_address,
        to_address,
        timestamp,
        read_status: defaults.read_status(),
        subject: defaults.subject(),
        body: compose_body(row.get_string("content")?, row.get_string("attachement_local_uri")?),
        thread_id,
    })
}
