/// End-to-end recipe tests
///
/// Each test runs one recipe (or composite) through the driver on a whole
/// Java file and compares the printed result:
/// 1. assertTrue to AssertJ assertThat
/// 2. assertTrue/assertFalse simplifications
/// 3. tests without assertions
/// 4. the JUnit 4 to 5 migration
use testrecipes_core::{activate, run, RecipeContext, RunResult};

fn run_recipe(recipe: &str, before: &str) -> RunResult {
    let recipes = activate(&[recipe]).expect("known recipe");
    run(before, "MyTest.java", &recipes, &RecipeContext::default()).expect("input parses")
}

fn rewrite(recipe: &str, before: &str, after: &str) {
    let result = run_recipe(recipe, before);
    assert_eq!(result.after, after);
    assert!(result.changed);

    let again = run_recipe(recipe, &result.after);
    assert!(!again.changed, "second run changed the file:\n{}", again.after);
}

fn unchanged(recipe: &str, source: &str) {
    let result = run_recipe(recipe, source);
    assert_eq!(result.after, source);
    assert!(!result.changed);
    assert!(result.applied.is_empty());
}

// ---------------------------------------------------------------------------
// assertj.JUnitAssertTrueToAssertThat
// ---------------------------------------------------------------------------

const ASSERTJ: &str = "assertj.JUnitAssertTrueToAssertThat";

#[test]
fn test_assert_true_static_import_replaced_in_place() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.Test;

import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    @Test
    public void test() {
        int a = 1;
        assertTrue(a > 0);
    }
}
"#,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.assertThat;

public class MyTest {
    @Test
    public void test() {
        int a = 1;
        assertThat(a > 0).isTrue();
    }
}
"#,
    );
}

#[test]
fn test_assert_true_with_message_replaces_wildcard() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.Test;

import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertTrue(a, "a should be true");
    }
}
"#,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.assertThat;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertThat(a).as("a should be true").isTrue();
    }
}
"#,
    );
}

#[test]
fn test_assert_true_with_message_supplier() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.Test;

import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertTrue(a, () -> "a should be true");
    }
}
"#,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.assertThat;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertThat(a).withFailMessage(() -> "a should be true").isTrue();
    }
}
"#,
    );
}

#[test]
fn test_assert_true_fully_qualified_calls() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.Test;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        org.junit.jupiter.api.Assertions.assertTrue(a);
        org.junit.jupiter.api.Assertions.assertTrue(a, "a should be true");
    }
}
"#,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.assertThat;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertThat(a).isTrue();
        assertThat(a).as("a should be true").isTrue();
    }
}
"#,
    );
}

#[test]
fn test_assert_true_existing_assertj_wildcard_kept() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.*;
import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertTrue(a);
        assertThat(a).isEqualTo(true);
    }
}
"#,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertThat(a).isTrue();
        assertThat(a).isEqualTo(true);
    }
}
"#,
    );
}

#[test]
fn test_assert_true_boolean_supplier_left_alone() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.Test;

import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertTrue(a);
        assertTrue(() -> a);
    }
}
"#,
        r#"import org.junit.Test;

import static org.assertj.core.api.Assertions.assertThat;
import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    @Test
    public void test() {
        boolean a = true;
        assertThat(a).isTrue();
        assertTrue(() -> a);
    }
}
"#,
    );
}

#[test]
fn test_assert_true_shadowed_by_local_assert_that() {
    unchanged(
        ASSERTJ,
        r#"import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    void test(boolean a) {
        assertTrue(a);
    }

    private void assertThat(boolean value) {
    }
}
"#,
    );
}

#[test]
fn test_assert_true_from_other_library_left_alone() {
    unchanged(
        ASSERTJ,
        r#"import static org.junit.Assert.assertTrue;

public class MyTest {
    void test(boolean a) {
        assertTrue(a);
    }
}
"#,
    );
}

#[test]
fn test_assert_true_left_alone_while_assert_that_comes_from_a_wildcard() {
    unchanged(
        ASSERTJ,
        r#"import java.util.List;

import org.junit.jupiter.api.Test;

import static org.hamcrest.MatcherAssert.*;
import static org.hamcrest.Matchers.*;
import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        List<String> list = List.of("a");
        int a = 1;
        assertThat(list, hasSize(1));
        assertTrue(a > 0);
    }
}
"#,
    );
}

#[test]
fn test_assert_true_keeps_wildcard_for_remaining_members() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.jupiter.api.Test;

import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        int a = 1;
        assertThrowsExactly(IllegalStateException.class, () -> service.run(a));
        assertTrue(a > 0);
    }
}
"#,
        r#"import org.junit.jupiter.api.Test;

import static org.assertj.core.api.Assertions.assertThat;
import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        int a = 1;
        assertThrowsExactly(IllegalStateException.class, () -> service.run(a));
        assertThat(a > 0).isTrue();
    }
}
"#,
    );
}

#[test]
fn test_assert_true_keeps_wildcard_while_a_call_is_unresolved() {
    rewrite(
        ASSERTJ,
        r#"import org.junit.jupiter.api.Test;

import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        int a = 1;
        assertPositive(a);
        assertTrue(a > 0);
    }
}
"#,
        r#"import org.junit.jupiter.api.Test;

import static org.assertj.core.api.Assertions.assertThat;
import static org.junit.jupiter.api.Assertions.*;

public class MyTest {
    @Test
    public void test() {
        int a = 1;
        assertPositive(a);
        assertThat(a > 0).isTrue();
    }
}
"#,
    );
}

// ---------------------------------------------------------------------------
// cleanup.AssertTrueComparisonToAssertEquals and friends
// ---------------------------------------------------------------------------

#[test]
fn test_comparison_static_import() {
    rewrite(
        "cleanup.AssertTrueComparisonToAssertEquals",
        r#"import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    void test() {
        int a = 1;
        int b = 1;
        assertTrue(a == b);
    }
}
"#,
        r#"import static org.junit.jupiter.api.Assertions.assertEquals;

public class MyTest {
    void test() {
        int a = 1;
        int b = 1;
        assertEquals(a, b);
    }
}
"#,
    );
}

#[test]
fn test_comparison_qualified_keeps_qualifier() {
    rewrite(
        "cleanup.AssertTrueComparisonToAssertEquals",
        r#"import org.junit.jupiter.api.Assertions;

public class MyTest {
    void test(int a, int b) {
        Assertions.assertTrue(a == b, "should match");
    }
}
"#,
        r#"import org.junit.jupiter.api.Assertions;

public class MyTest {
    void test(int a, int b) {
        Assertions.assertEquals(a, b, "should match");
    }
}
"#,
    );
}

#[test]
fn test_comparison_other_conditions_left_alone() {
    unchanged(
        "cleanup.AssertTrueComparisonToAssertEquals",
        r#"import java.util.List;

import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    void test(List<String> list, int a) {
        assertTrue(list.isEmpty());
        assertTrue(a != 1);
        assertTrue(a == 1 && list.isEmpty());
    }
}
"#,
    );
}

#[test]
fn test_negation_becomes_assert_true() {
    rewrite(
        "cleanup.AssertFalseNegationToAssertTrue",
        r#"import static org.junit.jupiter.api.Assertions.assertFalse;

public class MyTest {
    void test(boolean a) {
        assertFalse(!a);
    }
}
"#,
        r#"import static org.junit.jupiter.api.Assertions.assertTrue;

public class MyTest {
    void test(boolean a) {
        assertTrue(a);
    }
}
"#,
    );
}

#[test]
fn test_null_check_becomes_assert_not_null() {
    rewrite(
        "cleanup.AssertFalseNullToAssertNotNull",
        r#"import static org.junit.jupiter.api.Assertions.assertFalse;

public class MyTest {
    void test(String result) {
        assertFalse(result == null, "result is required");
    }
}
"#,
        r#"import static org.junit.jupiter.api.Assertions.assertNotNull;

public class MyTest {
    void test(String result) {
        assertNotNull(result, "result is required");
    }
}
"#,
    );
}

// ---------------------------------------------------------------------------
// cleanup.TestsShouldIncludeAssertions
// ---------------------------------------------------------------------------

const INCLUDE_ASSERTIONS: &str = "cleanup.TestsShouldIncludeAssertions";

#[test]
fn test_no_assertions_wrapped() {
    rewrite(
        INCLUDE_ASSERTIONS,
        r#"import org.junit.jupiter.api.Test;

public class AaTest {

    @Test
    public void methodTest() {
        Integer it = Integer.valueOf("2");
        System.out.println(it);
    }
}
"#,
        r#"import org.junit.jupiter.api.Test;

import static org.junit.jupiter.api.Assertions.assertDoesNotThrow;

public class AaTest {

    @Test
    public void methodTest() {
        assertDoesNotThrow(() -> {
            Integer it = Integer.valueOf("2");
            System.out.println(it);
        });
    }
}
"#,
    );
}

#[test]
fn test_mockito_stubbing_is_not_an_assertion() {
    rewrite(
        INCLUDE_ASSERTIONS,
        r#"import org.junit.jupiter.api.Test;
import org.mockito.Mock;

import static org.mockito.Mockito.when;

class AaTest {
    @Mock
    java.util.List<String> list;

    @Test
    void methodTest() {
        when(list.size()).thenReturn(1);
    }
}
"#,
        r#"import org.junit.jupiter.api.Test;
import org.mockito.Mock;

import static org.junit.jupiter.api.Assertions.assertDoesNotThrow;
import static org.mockito.Mockito.when;

class AaTest {
    @Mock
    java.util.List<String> list;

    @Test
    void methodTest() {
        assertDoesNotThrow(() -> {
            when(list.size()).thenReturn(1);
        });
    }
}
"#,
    );
}

#[test]
fn test_existing_assertions_left_alone() {
    unchanged(
        INCLUDE_ASSERTIONS,
        r#"import org.junit.jupiter.api.Test;
import org.mockito.Mock;

import static org.junit.jupiter.api.Assertions.assertDoesNotThrow;
import static org.junit.jupiter.api.Assertions.assertEquals;
import static org.mockito.Mockito.verify;

class AaTest {
    @Mock
    java.util.List<String> list;

    @Test
    void doesNotThrow() {
        assertDoesNotThrow(() -> list.clear());
    }

    @Test
    void jupiter() {
        assertEquals(1, list.size());
    }

    @Test
    void mockitoVerify() {
        list.clear();
        verify(list).clear();
    }

    @Test
    void qualified() {
        org.assertj.core.api.Assertions.assertThat(list).isEmpty();
    }

    @Test
    void hamcrest() {
        org.hamcrest.MatcherAssert.assertThat(list, org.hamcrest.Matchers.empty());
    }
}
"#,
    );
}

#[test]
fn test_non_tests_and_value_returns_left_alone() {
    unchanged(
        INCLUDE_ASSERTIONS,
        r#"import org.junit.jupiter.api.Test;

class AaTest {
    void helper() {
        System.out.println("not a test");
    }

    @Test
    void empty() {
    }

    @Test
    int returnsValue() {
        return 1;
    }
}
"#,
    );
}

#[test]
fn test_custom_assertion_type_from_config() {
    let source = r#"import org.junit.jupiter.api.Test;

import static com.example.CustomAssert.assertValid;

class AaTest {
    @Test
    void custom() {
        assertValid("x");
    }
}
"#;
    let config = testrecipes_core::Config::from_toml_str(
        "assertion_types = [\"com.example.CustomAssert\"]\n",
    )
    .unwrap();
    let recipes = activate(&[INCLUDE_ASSERTIONS]).unwrap();
    let result = run(source, "AaTest.java", &recipes, &config.context()).unwrap();
    assert!(!result.changed);

    let result = run(source, "AaTest.java", &recipes, &RecipeContext::default()).unwrap();
    assert!(result.changed);
    assert!(result.after.contains("assertDoesNotThrow(() -> {"));
}

#[test]
fn test_comments_move_into_the_wrapper() {
    rewrite(
        INCLUDE_ASSERTIONS,
        r#"import org.junit.jupiter.api.Test;

public class AaTest {
    @Test
    void methodTest() {
        // arrange
        Integer it = Integer.valueOf("2");
        System.out.println(it);
        // done
    }
}
"#,
        r#"import org.junit.jupiter.api.Test;

import static org.junit.jupiter.api.Assertions.assertDoesNotThrow;

public class AaTest {
    @Test
    void methodTest() {
        assertDoesNotThrow(() -> {
            // arrange
            Integer it = Integer.valueOf("2");
            System.out.println(it);
            // done
        });
    }
}
"#,
    );
}

#[test]
fn test_junit4_expected_exception_left_alone() {
    unchanged(
        INCLUDE_ASSERTIONS,
        r#"import org.junit.Test;

public class SampleTest {
    @Test(expected = IllegalStateException.class)
    public void throwsIt() {
        service.run();
    }

    @Test(timeout = 100)
    public void isQuick() {
        service.run();
    }
}
"#,
    );
}

// ---------------------------------------------------------------------------
// junit5.JUnit4to5Migration
// ---------------------------------------------------------------------------

const MIGRATION: &str = "junit5.JUnit4to5Migration";

#[test]
fn test_migration_assert_that_receiver() {
    let result = run_recipe(
        MIGRATION,
        r#"import org.junit.Assert;
import org.junit.Test;

import static java.util.Arrays.asList;
import static org.hamcrest.Matchers.containsInAnyOrder;

public class SampleTest {
    @Test
    public void filterShouldRemoveUnusedConfig() {
        Assert.assertThat(asList("1", "2", "3"),
                containsInAnyOrder("3", "2", "1"));
    }
}
"#,
    );
    assert_eq!(
        result.after,
        r#"import org.junit.jupiter.api.Test;

import static java.util.Arrays.asList;
import static org.hamcrest.MatcherAssert.assertThat;
import static org.hamcrest.Matchers.containsInAnyOrder;

public class SampleTest {
    @Test
    void filterShouldRemoveUnusedConfig() {
        assertThat(asList("1", "2", "3"),
                containsInAnyOrder("3", "2", "1"));
    }
}
"#
    );
    assert_eq!(
        result.applied,
        vec![
            "junit5.UpdateTestAnnotation",
            "junit5.AssertThatToMatcherAssert",
            "junit5.RemoveTestMethodPublicModifier",
        ]
    );

    let again = run_recipe(MIGRATION, &result.after);
    assert!(!again.changed);
}

#[test]
fn test_migration_fully_qualified_annotation() {
    rewrite(
        "junit5.UpdateTestAnnotation",
        r#"public class SampleTest {
    @org.junit.Test
    public void works() {
    }
}
"#,
        r#"public class SampleTest {
    @org.junit.jupiter.api.Test
    public void works() {
    }
}
"#,
    );
}

#[test]
fn test_migration_skips_test_with_attributes() {
    unchanged(
        "junit5.UpdateTestAnnotation",
        r#"import org.junit.Test;

public class SampleTest {
    @Test(expected = IllegalStateException.class)
    public void throwsIt() {
        throw new IllegalStateException();
    }
}
"#,
    );
}

#[test]
fn test_public_kept_on_overrides_and_junit4_tests() {
    unchanged(
        "junit5.RemoveTestMethodPublicModifier",
        r#"import org.junit.Test;

public class SampleTest {
    @Test
    public void stillJUnit4() {
        System.out.println();
    }

    @Override
    public String toString() {
        return "SampleTest";
    }
}
"#,
    );
}

#[test]
fn test_unparseable_unit_is_an_error() {
    let recipes = activate(&[MIGRATION]).unwrap();
    let result = run("public class Broken {", "Broken.java", &recipes, &RecipeContext::default());
    assert!(result.is_err());
}

#[test]
fn test_migration_leaves_expected_exception_tests_passing() {
    unchanged(
        MIGRATION,
        r#"import org.junit.Test;

public class SampleTest {
    @Test(expected = IllegalStateException.class)
    public void throwsIt() {
        service.run();
    }
}
"#,
    );
}
