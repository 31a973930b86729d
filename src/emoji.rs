//! Emoji shortcode table.
//!
//! Only the heading identifier pass uses this: `:shortcode:` sequences in
//! heading text are replaced by the emoji they name before slugging.
//!
//! The table is a subset of GitHub's shortcode names: faces, hands, common
//! objects and the status markers used in project docs. A name outside it
//! stays in the text as written, colons included, so the slug keeps the
//! name's letters instead of dropping an emoji.

/// Sorted by shortcode for binary search.
static SHORTCODES: &[(&str, &str)] = &[
    ("+1", "👍"),
    ("-1", "👎"),
    ("100", "💯"),
    ("1234", "🔢"),
    ("8ball", "🎱"),
    ("a", "🅰️"),
    ("ab", "🆎"),
    ("abc", "🔤"),
    ("airplane", "✈️"),
    ("alarm_clock", "⏰"),
    ("alien", "👽"),
    ("ambulance", "🚑"),
    ("anchor", "⚓"),
    ("angel", "👼"),
    ("anger", "💢"),
    ("angry", "😠"),
    ("ant", "🐜"),
    ("apple", "🍎"),
    ("arrow_down", "⬇️"),
    ("arrow_left", "⬅️"),
    ("arrow_right", "➡️"),
    ("arrow_up", "⬆️"),
    ("art", "🎨"),
    ("astonished", "😲"),
    ("atom_symbol", "⚛️"),
    ("b", "🅱️"),
    ("baby", "👶"),
    ("balloon", "🎈"),
    ("bangbang", "‼️"),
    ("bar_chart", "📊"),
    ("battery", "🔋"),
    ("beer", "🍺"),
    ("beers", "🍻"),
    ("beetle", "🐞"),
    ("bell", "🔔"),
    ("bike", "🚲"),
    ("bird", "🐦"),
    ("birthday", "🎂"),
    ("blush", "😊"),
    ("bomb", "💣"),
    ("book", "📖"),
    ("bookmark", "🔖"),
    ("books", "📚"),
    ("boom", "💥"),
    ("bow", "🙇"),
    ("broken_heart", "💔"),
    ("bug", "🐛"),
    ("bulb", "💡"),
    ("bus", "🚌"),
    ("cake", "🍰"),
    ("calendar", "📆"),
    ("camera", "📷"),
    ("car", "🚗"),
    ("cat", "🐱"),
    ("chart_with_downwards_trend", "📉"),
    ("chart_with_upwards_trend", "📈"),
    ("check", "✔️"),
    ("checkered_flag", "🏁"),
    ("cherries", "🍒"),
    ("christmas_tree", "🎄"),
    ("clap", "👏"),
    ("clipboard", "📋"),
    ("clock1", "🕐"),
    ("closed_book", "📕"),
    ("cloud", "☁️"),
    ("coffee", "☕"),
    ("cold_sweat", "😰"),
    ("computer", "💻"),
    ("confetti_ball", "🎊"),
    ("confused", "😕"),
    ("construction", "🚧"),
    ("cookie", "🍪"),
    ("cool", "🆒"),
    ("copyright", "©️"),
    ("cow", "🐮"),
    ("crab", "🦀"),
    ("credit_card", "💳"),
    ("crossed_fingers", "🤞"),
    ("crown", "👑"),
    ("cry", "😢"),
    ("crystal_ball", "🔮"),
    ("cupid", "💘"),
    ("dart", "🎯"),
    ("dash", "💨"),
    ("date", "📅"),
    ("disappointed", "😞"),
    ("dizzy", "💫"),
    ("dog", "🐶"),
    ("dollar", "💵"),
    ("door", "🚪"),
    ("dragon", "🐉"),
    ("droplet", "💧"),
    ("ear", "👂"),
    ("earth_africa", "🌍"),
    ("earth_americas", "🌎"),
    ("earth_asia", "🌏"),
    ("egg", "🥚"),
    ("email", "📧"),
    ("envelope", "✉️"),
    ("exclamation", "❗"),
    ("expressionless", "😑"),
    ("eyes", "👀"),
    ("facepunch", "👊"),
    ("fearful", "😨"),
    ("file_folder", "📁"),
    ("fire", "🔥"),
    ("fireworks", "🎆"),
    ("fish", "🐟"),
    ("fist", "✊"),
    ("flashlight", "🔦"),
    ("floppy_disk", "💾"),
    ("flushed", "😳"),
    ("fox_face", "🦊"),
    ("frog", "🐸"),
    ("frowning", "😦"),
    ("gear", "⚙️"),
    ("gem", "💎"),
    ("ghost", "👻"),
    ("gift", "🎁"),
    ("globe_with_meridians", "🌐"),
    ("grey_question", "❔"),
    ("grimacing", "😬"),
    ("grin", "😁"),
    ("grinning", "😀"),
    ("hammer", "🔨"),
    ("hammer_and_wrench", "🛠️"),
    ("hand", "✋"),
    ("hankey", "💩"),
    ("hash", "#️⃣"),
    ("heart", "❤️"),
    ("heart_eyes", "😍"),
    ("heavy_check_mark", "✔️"),
    ("heavy_minus_sign", "➖"),
    ("heavy_plus_sign", "➕"),
    ("hibiscus", "🌺"),
    ("hocho", "🔪"),
    ("honeybee", "🐝"),
    ("hook", "🪝"),
    ("hourglass", "⌛"),
    ("house", "🏠"),
    ("hugs", "🤗"),
    ("hushed", "😯"),
    ("icecream", "🍦"),
    ("id", "🆔"),
    ("imp", "👿"),
    ("inbox_tray", "📥"),
    ("info", "ℹ️"),
    ("information_source", "ℹ️"),
    ("innocent", "😇"),
    ("joy", "😂"),
    ("key", "🔑"),
    ("keyboard", "⌨️"),
    ("kiss", "💋"),
    ("kissing", "😗"),
    ("koala", "🐨"),
    ("label", "🏷️"),
    ("ladybug", "🐞"),
    ("laptop", "💻"),
    ("laughing", "😆"),
    ("leaves", "🍃"),
    ("lemon", "🍋"),
    ("light_rail", "🚈"),
    ("link", "🔗"),
    ("lion", "🦁"),
    ("lipstick", "💄"),
    ("lock", "🔒"),
    ("loudspeaker", "📢"),
    ("love_letter", "💌"),
    ("mag", "🔍"),
    ("mag_right", "🔎"),
    ("mailbox", "📫"),
    ("man_technologist", "👨‍💻"),
    ("mask", "😷"),
    ("medal_sports", "🏅"),
    ("mega", "📣"),
    ("memo", "📝"),
    ("microscope", "🔬"),
    ("milky_way", "🌌"),
    ("monkey", "🐒"),
    ("moon", "🌔"),
    ("mortar_board", "🎓"),
    ("mouse", "🐭"),
    ("muscle", "💪"),
    ("mushroom", "🍄"),
    ("musical_note", "🎵"),
    ("nail_care", "💅"),
    ("necktie", "👔"),
    ("neutral_face", "😐"),
    ("new", "🆕"),
    ("new_moon", "🌑"),
    ("newspaper", "📰"),
    ("no_entry", "⛔"),
    ("no_entry_sign", "🚫"),
    ("notebook", "📓"),
    ("ok", "🆗"),
    ("ok_hand", "👌"),
    ("open_mouth", "😮"),
    ("outbox_tray", "📤"),
    ("owl", "🦉"),
    ("package", "📦"),
    ("page_facing_up", "📄"),
    ("palm_tree", "🌴"),
    ("panda_face", "🐼"),
    ("paperclip", "📎"),
    ("partying_face", "🥳"),
    ("pencil", "📝"),
    ("pencil2", "✏️"),
    ("penguin", "🐧"),
    ("pensive", "😔"),
    ("persevere", "😣"),
    ("phone", "☎️"),
    ("pig", "🐷"),
    ("pill", "💊"),
    ("pizza", "🍕"),
    ("point_down", "👇"),
    ("point_left", "👈"),
    ("point_right", "👉"),
    ("point_up", "☝️"),
    ("police_car", "🚓"),
    ("poop", "💩"),
    ("pray", "🙏"),
    ("pushpin", "📌"),
    ("pushpin_round", "📍"),
    ("question", "❓"),
    ("rabbit", "🐰"),
    ("racehorse", "🐎"),
    ("rage", "😡"),
    ("rainbow", "🌈"),
    ("raised_hands", "🙌"),
    ("recycle", "♻️"),
    ("red_circle", "🔴"),
    ("relaxed", "☺️"),
    ("relieved", "😌"),
    ("repeat", "🔁"),
    ("rewind", "⏪"),
    ("ribbon", "🎀"),
    ("robot", "🤖"),
    ("rocket", "🚀"),
    ("rofl", "🤣"),
    ("rose", "🌹"),
    ("rotating_light", "🚨"),
    ("round_pushpin", "📍"),
    ("runner", "🏃"),
    ("satellite", "📡"),
    ("scissors", "✂️"),
    ("scream", "😱"),
    ("see_no_evil", "🙈"),
    ("seedling", "🌱"),
    ("shield", "🛡️"),
    ("shipit", "🐿️"),
    ("shrug", "🤷"),
    ("skull", "💀"),
    ("sleeping", "😴"),
    ("sleepy", "😪"),
    ("slightly_smiling_face", "🙂"),
    ("smile", "😄"),
    ("smiley", "😃"),
    ("smirk", "😏"),
    ("snail", "🐌"),
    ("snake", "🐍"),
    ("snowflake", "❄️"),
    ("snowman", "⛄"),
    ("sob", "😭"),
    ("soccer", "⚽"),
    ("sos", "🆘"),
    ("sparkles", "✨"),
    ("sparkling_heart", "💖"),
    ("speech_balloon", "💬"),
    ("star", "⭐"),
    ("star2", "🌟"),
    ("stars", "🌠"),
    ("stop_sign", "🛑"),
    ("stuck_out_tongue", "😛"),
    ("sun_with_face", "🌞"),
    ("sunflower", "🌻"),
    ("sunglasses", "😎"),
    ("sunny", "☀️"),
    ("sweat", "😓"),
    ("sweat_smile", "😅"),
    ("tada", "🎉"),
    ("taxi", "🚕"),
    ("tea", "🍵"),
    ("telephone", "☎️"),
    ("telescope", "🔭"),
    ("tent", "⛺"),
    ("thinking", "🤔"),
    ("thought_balloon", "💭"),
    ("thumbsdown", "👎"),
    ("thumbsup", "👍"),
    ("ticket", "🎫"),
    ("tiger", "🐯"),
    ("timer_clock", "⏲️"),
    ("tired_face", "😫"),
    ("toilet", "🚽"),
    ("tongue", "👅"),
    ("tools", "🛠️"),
    ("trackball", "🖲️"),
    ("traffic_light", "🚥"),
    ("train", "🚋"),
    ("trophy", "🏆"),
    ("truck", "🚚"),
    ("tulip", "🌷"),
    ("turtle", "🐢"),
    ("tv", "📺"),
    ("umbrella", "☔"),
    ("unamused", "😒"),
    ("unicorn", "🦄"),
    ("unlock", "🔓"),
    ("upside_down_face", "🙃"),
    ("v", "✌️"),
    ("vertical_traffic_light", "🚦"),
    ("vhs", "📼"),
    ("video_camera", "📹"),
    ("video_game", "🎮"),
    ("volcano", "🌋"),
    ("warning", "⚠️"),
    ("watch", "⌚"),
    ("watermelon", "🍉"),
    ("wave", "👋"),
    ("whale", "🐳"),
    ("wheelchair", "♿"),
    ("white_check_mark", "✅"),
    ("wink", "😉"),
    ("wolf", "🐺"),
    ("worried", "😟"),
    ("wrench", "🔧"),
    ("x", "❌"),
    ("yellow_heart", "💛"),
    ("yum", "😋"),
    ("zap", "⚡"),
    ("zipper_mouth_face", "🤐"),
    ("zzz", "💤"),
];

/// Canonical text for a shortcode name (without colons).
pub fn shortcode_text(name: &str) -> Option<&'static str> {
    SHORTCODES
        .binary_search_by(|(code, _)| code.cmp(&name))
        .ok()
        .map(|idx| SHORTCODES[idx].1)
}

/// Append `text` to `out`, replacing every known `:shortcode:`.
pub fn substitute_into(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(open) = rest.find(':') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(':') else {
            break;
        };
        let name = &after[..close];
        let valid_name = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-'));
        match shortcode_text(name).filter(|_| valid_name) {
            Some(emoji) => {
                out.push_str(&rest[..open]);
                out.push_str(emoji);
                rest = &after[close + 1..];
            }
            None => {
                // the closing colon may open the next shortcode
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(SHORTCODES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn lookup() {
        assert_eq!(shortcode_text("rocket"), Some("🚀"));
        assert_eq!(shortcode_text("+1"), Some("👍"));
        assert_eq!(shortcode_text("nope"), None);
    }

    #[test]
    fn common_github_names() {
        assert_eq!(shortcode_text("partying_face"), Some("🥳"));
        assert_eq!(shortcode_text("white_check_mark"), Some("✅"));
        assert_eq!(shortcode_text("heavy_plus_sign"), Some("➕"));
        assert_eq!(shortcode_text("man_technologist"), Some("👨‍💻"));
        assert_eq!(shortcode_text("100"), Some("💯"));
        assert!(SHORTCODES.len() > 300);
    }

    #[test]
    fn substitution() {
        let mut out = String::new();
        substitute_into(&mut out, "Launch :rocket: now");
        assert_eq!(out, "Launch 🚀 now");

        out.clear();
        substitute_into(&mut out, "time 10:30 :tada:");
        assert_eq!(out, "time 10:30 🎉");

        out.clear();
        substitute_into(&mut out, ":unknown: and :");
        assert_eq!(out, ":unknown: and :");
    }
}
