//! The standard rubrics: every check of a grading run in report order.

use super::sheet::*;
use super::text::*;
use super::{SheetCheck, TextCheck};
use crate::config::GradingOptions;

/// Checks for a Word or Writer document.
pub fn text_catalog(options: &GradingOptions) -> Vec<TextCheck> {
    let diff = options.diff_options();
    let levels = options.heading_levels;

    let mut checks: Vec<TextCheck> = vec![
        Box::new(SectionCountCheck),
        Box::new(Section1TocCheck),
        Box::new(Section2TextCheck),
        Box::new(Section3FigureListCheck),
        Box::new(Section3TableListCheck),
        Box::new(Section3BibliographyCheck),
        Box::new(NormalStyleCheck::new(diff.clone())),
    ];
    for level in 1..=levels {
        checks.push(Box::new(HeadingStyleCheck::new(level, diff.clone())));
    }
    checks.extend([
        Box::new(HeadingHierarchicalNumberingCheck::new(levels)) as TextCheck,
        Box::new(TocHeadingNumberingCheck),
        Box::new(UnnumberedSpecialHeadingsCheck),
        Box::new(BibliographyStyleCheck::new(diff.clone())),
        Box::new(CaptionStyleCheck::new(diff.clone())),
        Box::new(ContentHeadingStyleCheck::new(diff.clone())),
        Box::new(CustomStyleCheck::new(diff)),
        Box::new(OriginalFormattingCheck),
        Box::new(InlineFormattingCheck),
        Box::new(CustomStyleInheritanceCheck),
        Box::new(RequiredCustomStylesUsageCheck),
        Box::new(CustomStyleWithTabsCheck),
        Box::new(MainChapterStartsOnNewPageCheck),
        Box::new(ManualHorizontalSpacingCheck),
        Box::new(ManualVerticalSpacingCheck),
        Box::new(ListLevel2UsedCheck),
        Box::new(TocExistsCheck),
        Box::new(TocUpToDateCheck::new(levels)),
        Box::new(TocIllegalContentCheck),
        Box::new(TocFirstSectionContentCheck),
        Box::new(DocumentStructureCheck),
        Box::new(HeadingsMatchAssignmentCheck),
        Box::new(TocHeadingLevelsCheck::new(levels)),
        Box::new(FirstChapterStartsOnPageOneCheck),
        Box::new(ChapterNumberingContinuityCheck),
        Box::new(MissingListOfFiguresCheck),
        Box::new(ListOfFiguresNotUpdatedCheck),
        Box::new(ObjectCaptionCheck),
        Box::new(ObjectCaptionTextCheck),
        Box::new(ObjectCrossReferenceCheck),
        Box::new(MissingBibliographyCheck),
        Box::new(BibliographyNotUpdatedCheck),
        Box::new(BibliographyIso690Check),
        Box::new(HeaderFooterMissingCheck),
        Box::new(SecondSectionHeaderHasTextCheck),
        Box::new(SecondSectionPageNumberStartsAtOneCheck),
    ]);

    for &section in &options.section_checks {
        if section <= 1 {
            checks.push(Box::new(SectionPartEmptyCheck::header(1)));
            checks.push(Box::new(SectionPartEmptyCheck::footer(1)));
        } else {
            checks.push(Box::new(NotLinkedToPreviousCheck::header(section)));
            checks.push(Box::new(NotLinkedToPreviousCheck::footer(section)));
            checks.push(Box::new(SectionFooterHasPageNumberCheck::new(section)));
        }
    }
    checks
}

/// Checks for an Excel or Calc workbook.
pub fn sheet_catalog(options: &GradingOptions) -> Vec<SheetCheck> {
    let data = options.data_sheet.as_str();

    let mut checks: Vec<SheetCheck> = options
        .required_sheets
        .iter()
        .map(|sheet| Box::new(RequiredWorksheetCheck::new(sheet.as_str())) as SheetCheck)
        .collect();
    checks.extend([
        Box::new(CopiedFromSourceCheck::new(options.source_sheet.as_str(), data)) as SheetCheck,
        Box::new(NonCopyableFormulasCheck::new(data)),
        Box::new(MissingOrWrongFormulaCheck::new(data)),
        Box::new(ArrayFormulaCheck),
        Box::new(NamedRangeUsageCheck),
        Box::new(RedundantAbsoluteReferenceCheck::new(data)),
        Box::new(DescriptiveStatisticsCheck::new(
            data,
            options.statistics_functions.iter().map(String::as_str),
        )),
        Box::new(NumberFormattingCheck::new(data)),
        Box::new(TableBorderCheck::new(data)),
        Box::new(MergedCellsCheck::new(
            data,
            options.merged_forbidden_ranges.iter().map(String::as_str),
        )),
        Box::new(HeaderFormattingCheck::new(data)),
        Box::new(WrapTextCheck::new(data, options.wrap_min_text_length)),
        Box::new(ConditionalFormattingExistsCheck::new(data)),
        Box::new(ConditionalFormattingCorrectnessCheck::new(data)),
        Box::new(MissingChartCheck::new(data)),
        Box::new(ChartTypeCheck::new(data)),
        Box::new(ChartFormattingCheck::new(data)),
        Box::new(ThreeDChartCheck::new(data)),
    ]);
    checks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_catalog_follows_options() {
        let options = GradingOptions::default();
        let checks = text_catalog(&options);
        let names: Vec<&str> = checks.iter().map(|c| c.name()).collect();
        assert_eq!(names.iter().filter(|n| n.contains("Heading") && n.ends_with("style")).count(), 3);
        assert!(names.contains(&"Section 2 header not linked to previous"));
        assert!(names.contains(&"Section 1 footer is empty"));
        assert!(names.contains(&"Table of contents holds only generated entries"));
        assert!(names.contains(&"Table of contents skips the first section"));

        let fewer = text_catalog(&options.clone().with_section_checks(vec![]).with_heading_levels(2));
        assert_eq!(fewer.len(), checks.len() - 8 - 1);
    }

    #[test]
    fn test_sheet_catalog() {
        let options = GradingOptions::default();
        let checks = sheet_catalog(&options);
        assert_eq!(checks[0].name(), "Sheet \"zdroj\" exists");
        assert_eq!(checks[1].name(), "Sheet \"data\" exists");
        assert_eq!(checks.len(), 20);
    }
}
