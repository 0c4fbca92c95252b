//! Checks over Word and Writer documents.
//!
//! Every check here implements `Check<dyn TextDocument, TextAssignment>`
//! and only talks to the document through [`crate::document::TextDocument`],
//! so the same check grades .docx and .odt files. Checks that need
//! sections skip themselves on formats without them.

pub mod bibliography;
pub mod header_footer;
pub mod objects;
pub mod section;
pub mod structure;
pub mod style;

#[cfg(test)]
pub(crate) mod fixture;

pub use bibliography::{BibliographyIso690Check, BibliographyNotUpdatedCheck, MissingBibliographyCheck};
pub use header_footer::{
    HeaderFooterMissingCheck, NotLinkedToPreviousCheck, Part, SecondSectionHeaderHasTextCheck,
    SecondSectionPageNumberStartsAtOneCheck, SectionFooterHasPageNumberCheck,
    SectionPartEmptyCheck,
};
pub use objects::{
    ListOfFiguresNotUpdatedCheck, MissingListOfFiguresCheck, ObjectCaptionCheck,
    ObjectCaptionTextCheck, ObjectCrossReferenceCheck,
};
pub use section::{
    Section1TocCheck, Section2TextCheck, Section3BibliographyCheck, Section3FigureListCheck,
    Section3TableListCheck, SectionCountCheck,
};
pub use structure::{
    ChapterNumberingContinuityCheck, DocumentStructureCheck, FirstChapterStartsOnPageOneCheck,
    HeadingsMatchAssignmentCheck, TocExistsCheck, TocFirstSectionContentCheck,
    TocHeadingLevelsCheck, TocHeadingNumberingCheck, TocIllegalContentCheck, TocUpToDateCheck,
    UnnumberedSpecialHeadingsCheck,
};
pub use style::{
    BibliographyStyleCheck, CaptionStyleCheck, ContentHeadingStyleCheck, CustomStyleCheck,
    CustomStyleInheritanceCheck, CustomStyleWithTabsCheck, HeadingHierarchicalNumberingCheck,
    HeadingStyleCheck, InlineFormattingCheck, ListLevel2UsedCheck, MainChapterStartsOnNewPageCheck,
    ManualHorizontalSpacingCheck, ManualVerticalSpacingCheck, NormalStyleCheck,
    OriginalFormattingCheck, RequiredCustomStylesUsageCheck,
};
