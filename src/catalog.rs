// ABOUTME: Static language catalog — judge language ids, default source templates,
// ABOUTME: and the snippet library backing the snippet-assembly screen.

/// A language selectable in the execution workspace.
#[derive(Debug, Clone, Copy)]
pub struct LanguageOption {
    /// Judge service language id.
    pub id: u32,
    /// Display name, also the value persisted in the workspace.
    pub name: &'static str,
    /// Source template the editor is reset to when this language is selected.
    pub template: &'static str,
}

pub const EXECUTION_LANGUAGES: &[LanguageOption] = &[
    LanguageOption {
        id: 63,
        name: "JavaScript",
        template: "console.log('Hello World');",
    },
    LanguageOption {
        id: 71,
        name: "Python",
        template: "print('Hello World')",
    },
    LanguageOption {
        id: 62,
        name: "Java",
        template: "import java.util.Scanner;\n\npublic class Main {\n  public static void main(String[] args) {\n    System.out.println(\"Hello World\");\n  }\n}",
    },
    LanguageOption {
        id: 54,
        name: "C++",
        template: "#include <iostream>\n\nint main() {\n  std::cout << \"Hello World\";\n  return 0;\n}",
    },
];

/// Look up an execution language by its display name.
pub fn execution_language(name: &str) -> Option<&'static LanguageOption> {
    EXECUTION_LANGUAGES.iter().find(|l| l.name == name)
}

/// A language selectable in the snippet-assembly workspace, keyed by a
/// lowercase identifier (also the key snippets are grouped under).
#[derive(Debug, Clone, Copy)]
pub struct SnippetLanguage {
    pub id: &'static str,
    /// Judge service language id.
    pub judge_id: u32,
    pub template: &'static str,
}

pub const SNIPPET_LANGUAGES: &[SnippetLanguage] = &[
    SnippetLanguage {
        id: "java",
        judge_id: 62,
        template: "import java.util.*;\n\npublic class Main {\n    public static void main(String[] args) {\n        \n    }\n}",
    },
    SnippetLanguage {
        id: "python",
        judge_id: 71,
        template: "# Start writing your Python code here\n\n",
    },
    SnippetLanguage {
        id: "javascript",
        judge_id: 63,
        template: "// Start writing your JavaScript code here\n\n",
    },
    SnippetLanguage {
        id: "cpp",
        judge_id: 54,
        template: "#include <iostream>\n\nint main() {\n    \n    return 0;\n}",
    },
];

/// Look up a snippet-assembly language by its lowercase id.
pub fn snippet_language(id: &str) -> Option<&'static SnippetLanguage> {
    SNIPPET_LANGUAGES.iter().find(|l| l.id == id)
}

/// Map a debugging challenge's language name (any case) to a judge id.
pub fn judge_language_id(language: &str) -> Option<u32> {
    match language.to_lowercase().as_str() {
        "javascript" => Some(63),
        "python" => Some(71),
        "java" => Some(62),
        "cpp" => Some(54),
        _ => None,
    }
}

/// A named snippet the user can insert at the editor cursor.
#[derive(Debug, Clone, Copy)]
pub struct Snippet {
    pub name: &'static str,
    pub language: &'static str,
    pub code: &'static str,
}

pub const SNIPPETS: &[Snippet] = &[
    // Java
    Snippet {
        name: "Main Class",
        language: "java",
        code: "public class Main {\n    public static void main(String[] args) {\n        // Your code here\n    }\n}\n",
    },
    Snippet {
        name: "If/Else Statement",
        language: "java",
        code: "if (condition) {\n    // Code if true\n} else {\n    // Code if false\n}\n",
    },
    Snippet {
        name: "For Loop",
        language: "java",
        code: "for (int i = 0; i < 5; i++) {\n    System.out.println(i);\n}\n",
    },
    Snippet {
        name: "While Loop",
        language: "java",
        code: "while (condition) {\n    // Loop body\n}\n",
    },
    Snippet {
        name: "Print to Console",
        language: "java",
        code: "System.out.println(\"Hello, World!\");\n",
    },
    Snippet {
        name: "Method",
        language: "java",
        code: "public static void myMethod() {\n    // Method body\n}\n",
    },
    Snippet {
        name: "Class",
        language: "java",
        code: "class MyClass {\n    // Fields and methods here\n}\n",
    },
    Snippet {
        name: "Try/Catch Block",
        language: "java",
        code: "try {\n    // Code to try\n} catch (Exception e) {\n    // Code to handle exception\n}\n",
    },
    Snippet {
        name: "Scanner Input",
        language: "java",
        code: "Scanner myObj = new Scanner(System.in);\nSystem.out.println(\"Enter username\");\n\nString userName = myObj.nextLine();\nSystem.out.println(\"Username is: \" + userName);\n",
    },
    Snippet {
        name: "ArrayList",
        language: "java",
        code: "ArrayList<String> cars = new ArrayList<String>();\n",
    },
    // Python
    Snippet {
        name: "Main Execution Block",
        language: "python",
        code: "if __name__ == \"__main__\":\n    # Your code here\n    pass\n",
    },
    Snippet {
        name: "If/Elif/Else",
        language: "python",
        code: "if condition:\n    # Code if true\nelif another_condition:\n    # Code if another is true\nelse:\n    # Code if false\n",
    },
    Snippet {
        name: "For Loop",
        language: "python",
        code: "for i in range(5):\n    print(i)\n",
    },
    Snippet {
        name: "While Loop",
        language: "python",
        code: "while condition:\n    # Loop body\n    pass\n",
    },
    Snippet {
        name: "Function",
        language: "python",
        code: "def my_function(arg1, arg2):\n    # Function body\n    return arg1 + arg2\n",
    },
    Snippet {
        name: "Print to Console",
        language: "python",
        code: "print(\"Hello, World!\")\n",
    },
    Snippet {
        name: "Class",
        language: "python",
        code: "class MyClass:\n  def __init__(self, name):\n    self.name = name\n",
    },
    Snippet {
        name: "Try/Except Block",
        language: "python",
        code: "try:\n    # Code to try\nexcept Exception as e:\n    print(e)\n",
    },
    Snippet {
        name: "List Comprehension",
        language: "python",
        code: "squares = [x**2 for x in range(10)]\n",
    },
    Snippet {
        name: "Dictionary",
        language: "python",
        code: "my_dict = {\"key\": \"value\"}\n",
    },
    // JavaScript
    Snippet {
        name: "If/Else Statement",
        language: "javascript",
        code: "if (condition) {\n  // Code if true\n} else {\n  // Code if false\n}\n",
    },
    Snippet {
        name: "For Loop",
        language: "javascript",
        code: "for (let i = 0; i < 5; i++) {\n  console.log(i);\n}\n",
    },
    Snippet {
        name: "While Loop",
        language: "javascript",
        code: "while (condition) {\n  // Loop body\n}\n",
    },
    Snippet {
        name: "Arrow Function",
        language: "javascript",
        code: "const myFunction = (param1, param2) => {\n  // Function body\n  return param1 + param2;\n};\n",
    },
    Snippet {
        name: "Async Function",
        language: "javascript",
        code: "async function fetchData() {\n  try {\n    const response = await fetch(\"URL\");\n    const data = await response.json();\n    console.log(data);\n  } catch (error) {\n    console.error(\"Error:\", error);\n  }\n}\n",
    },
    Snippet {
        name: "Log to Console",
        language: "javascript",
        code: "console.log(\"Hello, World!\");\n",
    },
    Snippet {
        name: "Try/Catch Block",
        language: "javascript",
        code: "try {\n  // Code to try\n} catch (error) {\n  console.error(error);\n}\n",
    },
    Snippet {
        name: "Map Array",
        language: "javascript",
        code: "const newArray = oldArray.map(element => element * 2);\n",
    },
    Snippet {
        name: "Filter Array",
        language: "javascript",
        code: "const filteredArray = oldArray.filter(element => element > 10);\n",
    },
    Snippet {
        name: "EventListener",
        language: "javascript",
        code: "document.getElementById(\"myBtn\").addEventListener(\"click\", () => {\n  // Action on click\n});\n",
    },
    // C++
    Snippet {
        name: "Main Function",
        language: "cpp",
        code: "#include <iostream>\n\nint main() {\n    // Your code here\n    std::cout << \"Hello, World!\" << std::endl;\n    return 0;\n}\n",
    },
    Snippet {
        name: "If/Else Statement",
        language: "cpp",
        code: "if (condition) {\n    // Code if true\n} else {\n    // Code if false\n}\n",
    },
    Snippet {
        name: "For Loop",
        language: "cpp",
        code: "for (int i = 0; i < 5; ++i) {\n    std::cout << i << std::endl;\n}\n",
    },
    Snippet {
        name: "While Loop",
        language: "cpp",
        code: "while (condition) {\n    // Loop body\n}\n",
    },
    Snippet {
        name: "Function",
        language: "cpp",
        code: "void myFunction(int arg1) {\n    // Function body\n}\n",
    },
    Snippet {
        name: "Class",
        language: "cpp",
        code: "class MyClass {\npublic:\n    MyClass() { // Constructor\n    \n    }\n};\n",
    },
    Snippet {
        name: "Vector",
        language: "cpp",
        code: "#include <vector>\n\nstd::vector<int> myVector;\n",
    },
    Snippet {
        name: "Struct",
        language: "cpp",
        code: "struct MyStruct {\n    int myNum;\n    std::string myString;\n};\n",
    },
    Snippet {
        name: "Pointer",
        language: "cpp",
        code: "int* ptr = &myVariable;\n",
    },
    Snippet {
        name: "Namespace",
        language: "cpp",
        code: "using namespace std;\n",
    },
];

/// All snippets available for one snippet-assembly language.
pub fn snippets_for(language: &str) -> Vec<&'static Snippet> {
    SNIPPETS.iter().filter(|s| s.language == language).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_language_lookup() {
        let python = execution_language("Python").unwrap();
        assert_eq!(python.id, 71);
        assert_eq!(python.template, "print('Hello World')");
        assert!(execution_language("Cobol").is_none());
    }

    #[test]
    fn execution_and_snippet_judge_ids_agree() {
        // The two workspaces drive the same judge service.
        assert_eq!(execution_language("Java").unwrap().id, snippet_language("java").unwrap().judge_id);
        assert_eq!(execution_language("C++").unwrap().id, snippet_language("cpp").unwrap().judge_id);
    }

    #[test]
    fn judge_language_id_is_case_insensitive() {
        assert_eq!(judge_language_id("JavaScript"), Some(63));
        assert_eq!(judge_language_id("PYTHON"), Some(71));
        assert_eq!(judge_language_id("brainfuck"), None);
    }

    #[test]
    fn every_snippet_language_has_snippets() {
        for lang in SNIPPET_LANGUAGES {
            assert!(
                !snippets_for(lang.id).is_empty(),
                "no snippets for {}",
                lang.id
            );
        }
    }

    #[test]
    fn snippets_only_reference_known_languages() {
        for snippet in SNIPPETS {
            assert!(
                snippet_language(snippet.language).is_some(),
                "snippet {:?} references unknown language {}",
                snippet.name,
                snippet.language
            );
        }
    }
}
