//! Default whitelist tables.
//!
//! Default deny: a tag not listed in `GOOD_TAGS` never reaches the output.
//! `img` and `iframe` are left out on purpose. `style` and `link` are
//! handled by the style-sheet toggle in `FirewallConfig`.

pub const GOOD_TAGS: &[&str] = &[
    "!doctype",
    "a",
    "abbr",
    "acronym",
    "address",
    "area",
    "b",
    "base",
    "basefont",
    "bdo",
    "big",
    "blockquote",
    "body",
    "br",
    "break",
    "button",
    "caption",
    "center",
    "code",
    "col",
    "colgroup",
    "dd",
    "del",
    "dir",
    "div",
    "dl",
    "dt",
    "em",
    "face",
    "fieldset",
    "font",
    "form",
    "frame",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "hr",
    "html",
    "i",
    "input",
    "ins",
    "isindex",
    "kbd",
    "label",
    "legend",
    "li",
    "map",
    "menu",
    "meta",
    "nobr",
    "noframes",
    "noscript",
    "ol",
    "optgroup",
    "option",
    "p",
    "pre",
    "q",
    "s",
    "samp",
    "select",
    "small",
    "span",
    "strike",
    "strong",
    "sub",
    "sup",
    "table",
    "tbody",
    "td",
    "textarea",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "tt",
    "u",
    "ul",
    "var",
];

/// Tags whose whole subtree is dropped.
pub const SKIPPED_TAGS: &[&str] = &["javascript", "script"];

/// Attributes stripped from otherwise permitted tags: script hooks and every
/// inline event handler.
pub const BAD_ATTRIBUTES: &[&str] = &[
    "javascript",
    "script",
    // window
    "onafterprint",
    "onbeforeprint",
    "onbeforeunload",
    "onerror",
    "onhashchange",
    "onload",
    "onmessage",
    "onoffline",
    "ononline",
    "onpagehide",
    "onpageshow",
    "onpopstate",
    "onresize",
    "onstorage",
    "onunload",
    // form
    "onblur",
    "onchange",
    "oncontextmenu",
    "onfocus",
    "oninput",
    "oninvalid",
    "onreset",
    "onsearch",
    "onselect",
    "onsubmit",
    // keyboard
    "onkeydown",
    "onkeypress",
    "onkeyup",
    // mouse
    "onclick",
    "ondblclick",
    "ondrag",
    "ondragend",
    "ondragenter",
    "ondragleave",
    "ondragover",
    "ondragstart",
    "ondrop",
    "onmousedown",
    "onmouseleave",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onmousewheel",
    "onscroll",
    "onwheel",
    // clipboard
    "oncopy",
    "oncut",
    "onpaste",
    // media
    "onabort",
    "oncanplay",
    "oncanplaythrough",
    "oncuechange",
    "ondurationchange",
    "onemptied",
    "onended",
    "onloadeddata",
    "onloadedmetadata",
    "onloadstart",
    "onpause",
    "onplay",
    "onplaying",
    "onprogress",
    "onratechange",
    "onseeked",
    "onseeking",
    "onstalled",
    "onsuspend",
    "ontimeupdate",
    "onvolumechange",
    "onwaiting",
    // misc
    "onshow",
    "ontoggle",
];

/// Tags the verification pass looks for in filtered output.
pub const SUSPECT_TAGS: &[&str] = &["img", "javascript", "script", "style", "video"];

pub const LEGACY_SUSPECT_TAGS: &[&str] = &["script", "img", "style"];

pub const STYLE: &str = "style";
pub const LINK: &str = "link";
