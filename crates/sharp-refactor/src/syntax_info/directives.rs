use sharp_syntax::{directive_name, SyntaxKind, SyntaxNode, SyntaxToken, TextRange};

use super::identity_eq;
use crate::edit::EditSet;

/// Every preprocessor directive of a document, in document order.
#[derive(Debug, Clone, Default)]
pub struct DirectiveInfo {
    root: Option<SyntaxNode>,
    directives: Vec<SyntaxToken>,
}

identity_eq!(DirectiveInfo, root);

pub fn directive_info(root: &SyntaxNode) -> DirectiveInfo {
    let directives: Vec<SyntaxToken> = root
        .descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| t.kind().is_directive())
        .collect();
    if directives.is_empty() {
        return DirectiveInfo::default();
    }
    DirectiveInfo {
        root: Some(root.clone()),
        directives,
    }
}

impl DirectiveInfo {
    pub fn success(&self) -> bool {
        self.root.is_some()
    }

    pub fn directives(&self) -> &[SyntaxToken] {
        &self.directives
    }

    pub fn of_kind(&self, kind: SyntaxKind) -> impl Iterator<Item = &SyntaxToken> + '_ {
        self.directives.iter().filter(move |t| t.kind() == kind)
    }

    /// Directives touching `span`.
    pub fn intersecting(&self, span: TextRange) -> impl Iterator<Item = &SyntaxToken> + '_ {
        self.directives
            .iter()
            .filter(move |t| TextRange::from(t.text_range()).intersects(span))
    }

    /// Deletes every directive line.
    pub fn remove_all(&self) -> EditSet {
        let mut edits = EditSet::new();
        let Some(root) = &self.root else {
            return edits;
        };
        let text = root.text().to_string();
        for directive in &self.directives {
            edits.delete(directive_line_range(&text, TextRange::from(directive.text_range())));
        }
        edits
    }
}

/// The whole line holding a directive: indentation before it and the line break after
/// it are included.
pub(crate) fn directive_line_range(text: &str, range: TextRange) -> TextRange {
    let start = range.start_usize().min(text.len());
    let line_start = text[..start].rfind('\n').map_or(0, |idx| idx + 1);
    let start = if text[line_start..start].trim().is_empty() {
        line_start
    } else {
        start
    };
    let end = range.end_usize().min(text.len());
    let rest = &text[end..];
    let end = if rest.starts_with("\r\n") {
        end + 2
    } else if rest.starts_with('\n') {
        end + 1
    } else {
        end
    };
    TextRange::new(start, end)
}

/// A `#region` directive and its matching `#endregion`. Nested regions are skipped
/// when matching.
#[derive(Debug, Clone, Default)]
pub struct RegionInfo {
    region: Option<SyntaxToken>,
    end_region: Option<SyntaxToken>,
}

identity_eq!(RegionInfo, region);

/// Accepts either end of the pair.
pub fn region_info(token: &SyntaxToken) -> RegionInfo {
    let (region, end_region) = match token.kind() {
        SyntaxKind::RegionDirective => (Some(token.clone()), find_match(token, true)),
        SyntaxKind::EndRegionDirective => (find_match(token, false), Some(token.clone())),
        _ => return RegionInfo::default(),
    };
    match (region, end_region) {
        (Some(region), Some(end_region)) => RegionInfo {
            region: Some(region),
            end_region: Some(end_region),
        },
        _ => RegionInfo::default(),
    }
}

/// Walks the document's directives from `token`, counting nested pairs.
fn find_match(token: &SyntaxToken, forward: bool) -> Option<SyntaxToken> {
    let (open, close) = if forward {
        (SyntaxKind::RegionDirective, SyntaxKind::EndRegionDirective)
    } else {
        (SyntaxKind::EndRegionDirective, SyntaxKind::RegionDirective)
    };
    let root = token.parent_ancestors().last()?;
    let info = directive_info(&root);
    let directives = info.directives();
    let index = directives.iter().position(|d| d == token)?;
    let candidates: Vec<&SyntaxToken> = if forward {
        directives[index + 1..].iter().collect()
    } else {
        directives[..index].iter().rev().collect()
    };
    let mut depth = 0usize;
    for candidate in candidates {
        if candidate.kind() == open {
            depth += 1;
        } else if candidate.kind() == close {
            if depth == 0 {
                return Some(candidate.clone());
            }
            depth -= 1;
        }
    }
    None
}

impl RegionInfo {
    pub fn success(&self) -> bool {
        self.region.is_some()
    }

    pub fn region_directive(&self) -> Option<&SyntaxToken> {
        self.region.as_ref()
    }

    pub fn end_region_directive(&self) -> Option<&SyntaxToken> {
        self.end_region.as_ref()
    }

    /// Text after `#region`, trimmed.
    pub fn name(&self) -> Option<String> {
        let text = self.region.as_ref()?.text();
        let rest = text.trim_start_matches('#').trim_start();
        let name = directive_name(text);
        Some(rest[name.len()..].trim().to_string())
    }

    /// From `#region` to the end of `#endregion`.
    pub fn range(&self) -> Option<TextRange> {
        Some(TextRange {
            start: u32::from(self.region.as_ref()?.text_range().start()),
            end: u32::from(self.end_region.as_ref()?.text_range().end()),
        })
    }

    /// Deletes both directive lines, keeping the enclosed text.
    pub fn remove_directives(&self, text: &str) -> EditSet {
        let mut edits = EditSet::new();
        if let (Some(region), Some(end_region)) = (&self.region, &self.end_region) {
            edits.delete(directive_line_range(text, TextRange::from(region.text_range())));
            edits.delete(directive_line_range(text, TextRange::from(end_region.text_range())));
        }
        edits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sharp_syntax::parse_csharp;

    const TEXT: &str = "class C\n{\n    #region Outer\n    #region Inner\n    int a;\n    #endregion\n    int b;\n    #endregion\n}\n";

    #[test]
    fn nested_regions_match_by_depth() {
        let root = parse_csharp(TEXT).syntax();
        let info = directive_info(&root);
        assert_eq!(info.directives().len(), 4);
        let outer = info
            .of_kind(SyntaxKind::RegionDirective)
            .next()
            .cloned()
            .expect("region");
        let region = region_info(&outer);
        assert_eq!(region.name().as_deref(), Some("Outer"));
        let end = region.end_region_directive().expect("end");
        assert_eq!(
            TextRange::from(end.text_range()),
            TextRange::from(info.directives()[3].text_range())
        );

        let from_end = region_info(&info.directives()[2]);
        assert_eq!(from_end.name().as_deref(), Some("Inner"));
    }

    #[test]
    fn removing_directives_keeps_content() {
        let root = parse_csharp(TEXT).syntax();
        let info = directive_info(&root);
        let text = info.remove_all().apply(TEXT).expect("apply");
        assert_eq!(text, "class C\n{\n    int a;\n    int b;\n}\n");
    }

    #[test]
    fn regions_around_members_without_modifiers_match() {
        let text = "class C\n{\n    #region R\n    int a;\n    void M() { }\n    #endregion\n}\n";
        let root = parse_csharp(text).syntax();
        let info = directive_info(&root);
        let region = region_info(&info.directives()[0]);
        assert_eq!(region.name().as_deref(), Some("R"));
        assert_eq!(
            region.remove_directives(text).apply(text).expect("apply"),
            "class C\n{\n    int a;\n    void M() { }\n}\n"
        );
        assert!(region_info(&info.directives()[1]).success());
    }

    #[test]
    fn unmatched_region_is_not_recognised() {
        let root = parse_csharp("#region A\nclass C { }\n").syntax();
        let info = directive_info(&root);
        assert!(!region_info(&info.directives()[0]).success());
        assert!(!directive_info(&parse_csharp("class C { }").syntax()).success());
    }
}
