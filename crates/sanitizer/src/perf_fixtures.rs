//! Inputs shared by benchmarks and scaling tests.

pub const BLOCK_TEMPLATE: &str = "<div class=box><a href=\"/x?a=1&amp;b=2\" title='t&eacute;st'>hello &lt;world&gt;</a><img src=x alt></div>";

pub fn make_blocks(blocks: usize) -> String {
    let mut html = String::with_capacity(BLOCK_TEMPLATE.len() * blocks);
    for _ in 0..blocks {
        html.push_str(BLOCK_TEMPLATE);
    }
    html
}

/// Text dense with references, including near-miss names that exercise the
/// longest-match fallback.
pub fn make_entity_text(repeats: usize) -> String {
    const CHUNK: &str = "a &amp; b &notin; c &noti; d &#x1F600; e &bogus; f & g ";
    CHUNK.repeat(repeats)
}
